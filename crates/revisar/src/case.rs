//! Test case model.
//!
//! A [`TestCase`] is a unit of test logic with an id, a priority, group
//! tags, optional dependencies on other cases, and an optional sequence of
//! data records. Cases are built explicitly through the builder and
//! inserted into the orchestrator's registry; there is no discovery by
//! scanning or metadata, so the dependency graph is exactly what the
//! builders declared.

use crate::config::HarnessConfig;
use crate::result::RevisarResult;
use crate::session::SessionDriver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle of one Test Case Execution.
///
/// Transitions are monotone: `Pending → Running →` exactly one of
/// `{Passed, Failed, Skipped}`; terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    /// Not started
    Pending,
    /// Body currently executing
    Running,
    /// Completed without fault
    Passed,
    /// Body, setup, or teardown raised a fault or failed an assertion
    Failed,
    /// Gated out without running (dependency not passed, or run aborted)
    Skipped,
}

impl TestStatus {
    /// Whether the status is terminal (final)
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Skipped)
    }

    /// Whether the status is `Passed`
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Uppercase tag used in result lines
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a case body (or setup/teardown hook) gets to work with.
pub struct CaseCx<'r> {
    /// The browser session for this run
    pub driver: &'r dyn SessionDriver,
    /// Harness configuration in effect
    pub config: &'r HarnessConfig,
    /// The data record for this execution, if the case is data-driven
    pub record: Option<&'r Value>,
}

impl CaseCx<'_> {
    /// String field of the current data record, empty when absent.
    #[must_use]
    pub fn record_str(&self, key: &str) -> &str {
        self.record
            .and_then(|r| r.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

impl fmt::Debug for CaseCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseCx")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

/// Body of a test case
pub type CaseBody = Box<dyn Fn(&CaseCx<'_>) -> RevisarResult<()>>;

/// A registered unit of test logic
pub struct TestCase {
    id: String,
    priority: i32,
    groups: BTreeSet<String>,
    dependencies: BTreeSet<String>,
    records: Vec<Value>,
    body: CaseBody,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("groups", &self.groups)
            .field("dependencies", &self.dependencies)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// Start building a case with the given unique id.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> TestCaseBuilder {
        TestCaseBuilder::new(id)
    }

    /// Unique case id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Priority; lower runs first among ready cases
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Informational group tags
    #[must_use]
    pub const fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Ids of cases this one depends on
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Data records; empty means a single parameterless execution
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Invoke the case body
    pub fn run(&self, ctx: &CaseCx<'_>) -> RevisarResult<()> {
        (self.body)(ctx)
    }
}

/// Builder for [`TestCase`]
pub struct TestCaseBuilder {
    id: String,
    priority: i32,
    groups: BTreeSet<String>,
    dependencies: BTreeSet<String>,
    records: Vec<Value>,
    body: Option<CaseBody>,
}

impl fmt::Debug for TestCaseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCaseBuilder")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl TestCaseBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority: 0,
            groups: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            records: Vec::new(),
            body: None,
        }
    }

    /// Set the priority (lower runs first among ready cases; default 0).
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Tag the case with a group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        let _ = self.groups.insert(group.into());
        self
    }

    /// Declare a dependency on another case id.
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        let _ = self.dependencies.insert(id.into());
        self
    }

    /// Append one data record; each record yields its own execution.
    #[must_use]
    pub fn record(mut self, record: Value) -> Self {
        self.records.push(record);
        self
    }

    /// Append a sequence of data records, preserving order.
    #[must_use]
    pub fn records(mut self, records: impl IntoIterator<Item = Value>) -> Self {
        self.records.extend(records);
        self
    }

    /// Set the case body.
    #[must_use]
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&CaseCx<'_>) -> RevisarResult<()> + 'static,
    {
        self.body = Some(Box::new(body));
        self
    }

    /// Finish the case. A case built without a body runs as a no-op.
    #[must_use]
    pub fn build(self) -> TestCase {
        TestCase {
            id: self.id,
            priority: self.priority,
            groups: self.groups,
            dependencies: self.dependencies,
            records: self.records,
            body: self.body.unwrap_or_else(|| Box::new(|_| Ok(()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod status_tests {
        use super::*;

        #[test]
        fn test_terminal_states() {
            assert!(!TestStatus::Pending.is_terminal());
            assert!(!TestStatus::Running.is_terminal());
            assert!(TestStatus::Passed.is_terminal());
            assert!(TestStatus::Failed.is_terminal());
            assert!(TestStatus::Skipped.is_terminal());
        }

        #[test]
        fn test_display_tags() {
            assert_eq!(TestStatus::Passed.to_string(), "PASSED");
            assert_eq!(TestStatus::Skipped.to_string(), "SKIPPED");
        }
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_builder_collects_fields() {
            let case = TestCase::builder("AUTH_010")
                .priority(7)
                .group("smoke")
                .group("critical")
                .depends_on("AUTH_001")
                .record(json!({"email": "a@b.c"}))
                .build();

            assert_eq!(case.id(), "AUTH_010");
            assert_eq!(case.priority(), 7);
            assert!(case.groups().contains("smoke"));
            assert!(case.groups().contains("critical"));
            assert!(case.dependencies().contains("AUTH_001"));
            assert_eq!(case.records().len(), 1);
        }

        #[test]
        fn test_duplicate_groups_and_deps_collapse() {
            let case = TestCase::builder("X")
                .group("smoke")
                .group("smoke")
                .depends_on("A")
                .depends_on("A")
                .build();
            assert_eq!(case.groups().len(), 1);
            assert_eq!(case.dependencies().len(), 1);
        }

        #[test]
        fn test_default_body_is_noop() {
            let case = TestCase::builder("X").build();
            let config = HarnessConfig::default();
            let session = crate::mock::MockSession::secure_docs();
            let ctx = CaseCx {
                driver: &session,
                config: &config,
                record: None,
            };
            assert!(case.run(&ctx).is_ok());
        }
    }

    mod record_access_tests {
        use super::*;

        #[test]
        fn test_record_str() {
            let config = HarnessConfig::default();
            let session = crate::mock::MockSession::secure_docs();
            let record = json!({"email": "x@y.z", "attempts": 3});
            let ctx = CaseCx {
                driver: &session,
                config: &config,
                record: Some(&record),
            };
            assert_eq!(ctx.record_str("email"), "x@y.z");
            assert_eq!(ctx.record_str("missing"), "");
            // Non-string fields read as empty rather than panicking.
            assert_eq!(ctx.record_str("attempts"), "");

            let ctx = CaseCx {
                driver: &session,
                config: &config,
                record: None,
            };
            assert_eq!(ctx.record_str("email"), "");
        }
    }
}
