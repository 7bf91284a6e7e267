//! Run aggregation and result sinks.
//!
//! Every Test Case Execution folds into exactly one [`ExecutionRecord`],
//! appended both to the in-memory [`TestRun`] and to whatever
//! [`ResultSink`] the embedding process wired up. Sinks are append-only
//! collaborators: the core never reads records back out of one.

use crate::case::TestStatus;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One (test case, data record) execution outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Id of the test case
    pub case_id: String,
    /// Index into the case's data records; `None` for parameterless cases
    pub record_index: Option<usize>,
    /// Terminal status of the execution
    pub status: TestStatus,
    /// Free-text outcome description
    pub description: String,
    /// When the execution started (or was skipped)
    pub started: SystemTime,
    /// When the execution reached its terminal status
    pub finished: SystemTime,
}

impl ExecutionRecord {
    /// Label combining case id and record index, e.g. `AUTH_011[2]`
    #[must_use]
    pub fn label(&self) -> String {
        match self.record_index {
            Some(index) => format!("{}[{index}]", self.case_id),
            None => self.case_id.clone(),
        }
    }
}

/// Ordered collection of executions for one harness invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    /// Run name, for reporting
    pub name: String,
    records: Vec<ExecutionRecord>,
    started: SystemTime,
    finished: Option<SystemTime>,
    aborted: Option<String>,
}

impl TestRun {
    /// Start a named run
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            started: SystemTime::now(),
            finished: None,
            aborted: None,
        }
    }

    /// Append one execution outcome
    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    /// Close the run
    pub fn finish(&mut self) {
        self.finished = Some(SystemTime::now());
    }

    /// Record that the run was cut short by a fatal session fault
    pub fn abort(&mut self, reason: impl Into<String>) {
        if self.aborted.is_none() {
            self.aborted = Some(reason.into());
        }
    }

    /// All execution records, in execution order
    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    /// Why the run aborted early, if it did
    #[must_use]
    pub fn aborted(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    /// Most recent terminal status recorded for a case
    #[must_use]
    pub fn status_of(&self, case_id: &str) -> Option<TestStatus> {
        self.records
            .iter()
            .rev()
            .find(|r| r.case_id == case_id)
            .map(|r| r.status)
    }

    /// Total number of executions
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Number of passed executions
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Number of failed executions
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Number of skipped executions
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    fn count(&self, status: TestStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Whether every execution passed and the run ran to completion
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.aborted.is_none() && self.records.iter().all(|r| r.status.is_passed())
    }

    /// The failed executions, in order
    #[must_use]
    pub fn failures(&self) -> Vec<&ExecutionRecord> {
        self.records
            .iter()
            .filter(|r| r.status == TestStatus::Failed)
            .collect()
    }
}

/// Append-only receiver of execution records
pub trait ResultSink {
    /// Accept one record; the core never reads it back
    fn push(&mut self, record: &ExecutionRecord);
}

/// Sink that keeps records in memory (mostly for tests and embedding)
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ExecutionRecord>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far
    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }
}

impl ResultSink for MemorySink {
    fn push(&mut self, record: &ExecutionRecord) {
        self.records.push(record.clone());
    }
}

/// Sink that emits one structured log line per execution
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create the sink
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResultSink for TracingSink {
    fn push(&mut self, record: &ExecutionRecord) {
        tracing::info!(
            target: "revisar::results",
            case = %record.label(),
            status = %record.status,
            "Test Case: {} | Result: {} | Description: {}",
            record.label(),
            record.status,
            record.description
        );
    }
}
