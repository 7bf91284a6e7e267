//! Assertions for case bodies.
//!
//! Case bodies return `RevisarResult<()>`; these helpers turn a failed
//! check into an [`AssertionFailed`](crate::RevisarError::AssertionFailed)
//! carrying the caller's message, which the orchestrator records as a
//! `Failed` execution without aborting the run.

use crate::result::{RevisarError, RevisarResult};
use std::fmt::Debug;

/// Assert a condition holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> RevisarResult<()> {
    if condition {
        Ok(())
    } else {
        Err(RevisarError::assertion(message))
    }
}

/// Assert a condition does not hold.
pub fn ensure_not(condition: bool, message: impl Into<String>) -> RevisarResult<()> {
    ensure(!condition, message)
}

/// Assert two values are equal.
pub fn ensure_eq<T: PartialEq + Debug>(
    actual: &T,
    expected: &T,
    context: &str,
) -> RevisarResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(RevisarError::assertion(format!(
            "{context}: expected {expected:?}, got {actual:?}"
        )))
    }
}

/// Assert a string contains a substring.
pub fn ensure_contains(haystack: &str, needle: &str, context: &str) -> RevisarResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(RevisarError::assertion(format!(
            "{context}: expected '{haystack}' to contain '{needle}'"
        )))
    }
}
