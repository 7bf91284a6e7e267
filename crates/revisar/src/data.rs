//! Test data provider.
//!
//! An external collaborator in the design: the orchestrator and the case
//! bodies consume fixtures through [`DataProvider`] and never care where
//! they came from. [`StaticData`] ships the canonical fixtures the login
//! regression runs against.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical account the positive-path cases log in with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidUser {
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Display name shown in the dashboard welcome message
    pub name: String,
}

/// One negative-login tuple for the data-driven cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidLogin {
    /// Email to submit
    pub email: String,
    /// Password to submit
    pub password: String,
    /// Substring the resulting error must contain
    pub expected_error: String,
}

impl InvalidLogin {
    fn new(email: &str, password: &str, expected_error: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            expected_error: expected_error.to_string(),
        }
    }

    /// Convert to a data record for case fan-out.
    #[must_use]
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Source of test fixtures
pub trait DataProvider {
    /// The valid user account
    fn valid_user(&self) -> ValidUser;

    /// Ordered negative-login tuples
    fn invalid_logins(&self) -> Vec<InvalidLogin>;

    /// Negative-login tuples as fan-out records, preserving order.
    fn invalid_login_records(&self) -> Vec<Value> {
        self.invalid_logins().iter().map(InvalidLogin::to_record).collect()
    }
}

/// The built-in fixture set
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticData;

impl StaticData {
    /// Create the provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DataProvider for StaticData {
    fn valid_user(&self) -> ValidUser {
        ValidUser {
            email: "testuser@example.com".to_string(),
            password: "TestPass123!".to_string(),
            name: "Test User".to_string(),
        }
    }

    fn invalid_logins(&self) -> Vec<InvalidLogin> {
        vec![
            InvalidLogin::new("nonexistent@example.com", "WrongPassword123!", "Invalid credentials"),
            InvalidLogin::new("invalid-email", "password123", "Invalid credentials"),
            InvalidLogin::new("", "", "required"),
            InvalidLogin::new("test@example.com", "", "required"),
            InvalidLogin::new("", "password123", "required"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_fixture() {
        let user = StaticData::new().valid_user();
        assert_eq!(user.email, "testuser@example.com");
        assert_eq!(user.name, "Test User");
        assert!(!user.password.is_empty());
    }

    #[test]
    fn test_invalid_logins_are_ordered_and_stable() {
        let provider = StaticData::new();
        let logins = provider.invalid_logins();
        assert_eq!(logins.len(), 5);
        assert_eq!(logins[0].email, "nonexistent@example.com");
        assert_eq!(logins[0].expected_error, "Invalid credentials");
        assert_eq!(logins[2].expected_error, "required");
        // Same order every call
        assert_eq!(provider.invalid_logins(), logins);
    }

    #[test]
    fn test_records_round_trip_fields() {
        let records = StaticData::new().invalid_login_records();
        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0].get("email").and_then(Value::as_str),
            Some("nonexistent@example.com")
        );
        assert_eq!(
            records[0].get("expected_error").and_then(Value::as_str),
            Some("Invalid credentials")
        );
    }
}
