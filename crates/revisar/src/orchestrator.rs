//! Test orchestration: graph, ordering, fan-out, gating, aggregation.
//!
//! The orchestrator owns an explicit registry of [`TestCase`]s and runs
//! them against one browser session:
//!
//! 1. **Graph build**: one node per case, an edge from every known
//!    dependency to its dependent; a cycle fails the whole run before any
//!    case executes.
//! 2. **Ordering**: Kahn's algorithm; ties among ready cases break by
//!    ascending priority, then declaration order. Deterministic.
//! 3. **Fan-out**: each data record becomes its own execution, in record
//!    order; a case without records executes once.
//! 4. **Gate**: an execution runs only if every declared dependency's most
//!    recent terminal status is `Passed`; otherwise it is `Skipped` and its
//!    body is never invoked. An id that matches no registered case gates
//!    the same way as a dependency that never passed.
//! 5. **Run**: setup, body, teardown; teardown runs unconditionally, on
//!    both normal return and failure, so session-resetting cleanup (forced
//!    logout and the like) always happens.
//! 6. **Aggregate**: every execution appends to the [`TestRun`] and the
//!    [`ResultSink`].
//!
//! A case fault marks that execution `Failed` and the run continues with
//! the next independent case. Only a cyclic graph and a session-level
//! fault abort the run as a whole; on the latter, every not-yet-run
//! execution is recorded as `Skipped`.

use crate::case::{CaseCx, TestCase, TestStatus};
use crate::config::HarnessConfig;
use crate::report::{ExecutionRecord, ResultSink, TestRun};
use crate::result::{RevisarError, RevisarResult};
use crate::session::SessionDriver;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::SystemTime;

/// Setup/teardown hook signature
pub type Hook = Box<dyn Fn(&CaseCx<'_>) -> RevisarResult<()>>;

/// Registry plus execution engine for one suite of cases
pub struct Orchestrator {
    config: HarnessConfig,
    run_name: String,
    cases: Vec<TestCase>,
    index: HashMap<String, usize>,
    setup: Option<Hook>,
    teardown: Option<Hook>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("run_name", &self.run_name)
            .field("cases", &self.cases.len())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator with an empty registry.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            run_name: "test run".to_string(),
            cases: Vec::new(),
            index: HashMap::new(),
            setup: None,
            teardown: None,
        }
    }

    /// Name the run for reporting.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.run_name = name.into();
        self
    }

    /// Hook invoked before every execution's body.
    #[must_use]
    pub fn with_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CaseCx<'_>) -> RevisarResult<()> + 'static,
    {
        self.setup = Some(Box::new(hook));
        self
    }

    /// Hook invoked after every execution's body, unconditionally.
    #[must_use]
    pub fn with_teardown<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CaseCx<'_>) -> RevisarResult<()> + 'static,
    {
        self.teardown = Some(Box::new(hook));
        self
    }

    /// Insert a case into the registry.
    ///
    /// # Errors
    ///
    /// `DuplicateCase` if the id is already registered.
    pub fn register(&mut self, case: TestCase) -> RevisarResult<()> {
        if self.index.contains_key(case.id()) {
            return Err(RevisarError::DuplicateCase {
                id: case.id().to_string(),
            });
        }
        let _ = self.index.insert(case.id().to_string(), self.cases.len());
        self.cases.push(case);
        Ok(())
    }

    /// Number of registered cases
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// The validated execution order, as case ids.
    ///
    /// # Errors
    ///
    /// `CyclicDependency` if the declared graph has a cycle.
    pub fn execution_order(&self) -> RevisarResult<Vec<&str>> {
        Ok(self.plan()?.into_iter().map(|i| self.cases[i].id()).collect())
    }

    /// Run every case against the session, aggregating into a [`TestRun`].
    ///
    /// Returns the run even when a session fault cut it short (the abort
    /// reason is on the run); only an invalid dependency graph yields
    /// `Err`, before anything has executed.
    ///
    /// # Errors
    ///
    /// `CyclicDependency` from the pre-execution graph validation.
    pub fn run(
        &self,
        driver: &dyn SessionDriver,
        sink: &mut dyn ResultSink,
    ) -> RevisarResult<TestRun> {
        let order = self.plan()?;
        let mut run = TestRun::new(self.run_name.clone());
        let mut last_status: HashMap<&str, TestStatus> = HashMap::new();
        tracing::info!(run = %self.run_name, cases = order.len(), "starting test run");

        for ci in order {
            let case = &self.cases[ci];
            let record_indices: Vec<Option<usize>> = if case.records().is_empty() {
                vec![None]
            } else {
                (0..case.records().len()).map(Some).collect()
            };

            for record_index in record_indices {
                let record = record_index.map(|i| &case.records()[i]);
                let label = match record_index {
                    Some(i) => format!("{}[{i}]", case.id()),
                    None => case.id().to_string(),
                };
                let started = SystemTime::now();

                let (status, description) = if let Some(reason) = run.aborted() {
                    let description = format!("run aborted: {reason}");
                    tracing::warn!(case = %label, "skipped: {description}");
                    (TestStatus::Skipped, description)
                } else if let Some(dep) = self.unmet_dependency(case, &last_status) {
                    let description = format!("dependency '{dep}' did not pass");
                    tracing::warn!(case = %label, "skipped: {description}");
                    (TestStatus::Skipped, description)
                } else {
                    tracing::info!(case = %label, status = %TestStatus::Running, "executing");
                    let ctx = CaseCx {
                        driver,
                        config: &self.config,
                        record,
                    };
                    self.execute(case, &ctx, &mut run)
                };

                let _ = last_status.insert(case.id(), status);
                tracing::info!(case = %label, status = %status, "{description}");
                let record = ExecutionRecord {
                    case_id: case.id().to_string(),
                    record_index,
                    status,
                    description,
                    started,
                    finished: SystemTime::now(),
                };
                sink.push(&record);
                run.push(record);
            }
        }

        run.finish();
        tracing::info!(
            run = %self.run_name,
            passed = run.passed_count(),
            failed = run.failed_count(),
            skipped = run.skipped_count(),
            "test run finished"
        );
        Ok(run)
    }

    /// Setup, body, teardown for one execution. Teardown always runs; a
    /// fault from any of the three fails the execution, first fault wins;
    /// a fatal fault additionally aborts the rest of the run.
    fn execute(
        &self,
        case: &TestCase,
        ctx: &CaseCx<'_>,
        run: &mut TestRun,
    ) -> (TestStatus, String) {
        let setup_result = self.setup.as_ref().map_or(Ok(()), |hook| hook(ctx));
        let body_result = if setup_result.is_ok() {
            case.run(ctx)
        } else {
            Ok(())
        };
        let teardown_result = self.teardown.as_ref().map_or(Ok(()), |hook| hook(ctx));

        let results = [setup_result, body_result, teardown_result];
        if let Some(fatal) = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .find(|e| e.is_fatal())
        {
            run.abort(fatal.to_string());
        }
        match results.into_iter().find_map(Result::err) {
            None => (TestStatus::Passed, "completed".to_string()),
            Some(e) => (TestStatus::Failed, e.to_string()),
        }
    }

    fn unmet_dependency<'c>(
        &self,
        case: &'c TestCase,
        last_status: &HashMap<&str, TestStatus>,
    ) -> Option<&'c str> {
        case.dependencies()
            .iter()
            .map(String::as_str)
            .find(|dep| !last_status.get(dep).is_some_and(TestStatus::is_passed))
    }

    /// Kahn's algorithm over the declared graph; ready cases picked by
    /// (priority, declaration index).
    fn plan(&self) -> RevisarResult<Vec<usize>> {
        let n = self.cases.len();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];

        for (ci, case) in self.cases.iter().enumerate() {
            for dep in case.dependencies() {
                // Unknown ids create no edge; the runtime gate handles them.
                if let Some(&di) = self.index.get(dep.as_str()) {
                    dependents[di].push(ci);
                    indegree[ci] += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<(i32, usize)>> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(ci, _)| Reverse((self.cases[ci].priority(), ci)))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse((_, ci))) = ready.pop() {
            order.push(ci);
            for &dependent in &dependents[ci] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.push(Reverse((self.cases[dependent].priority(), dependent)));
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            let remaining: Vec<bool> = indegree.iter().map(|&d| d > 0).collect();
            Err(RevisarError::CyclicDependency {
                cycle: self.describe_cycle(&remaining),
            })
        }
    }

    /// Walk the leftover subgraph until an id repeats. Every leftover node
    /// keeps at least one leftover dependency, so the walk always closes.
    fn describe_cycle(&self, remaining: &[bool]) -> String {
        let Some(start) = remaining.iter().position(|&r| r) else {
            return String::new();
        };
        let mut seen: HashMap<usize, usize> = HashMap::new();
        let mut path = vec![start];
        let _ = seen.insert(start, 0);
        let mut current = start;

        loop {
            let next = self.cases[current]
                .dependencies()
                .iter()
                .filter_map(|d| self.index.get(d.as_str()).copied())
                .find(|&di| remaining[di]);
            let Some(next) = next else {
                break;
            };
            if let Some(&pos) = seen.get(&next) {
                let mut ids: Vec<&str> =
                    path[pos..].iter().map(|&i| self.cases[i].id()).collect();
                ids.push(self.cases[next].id());
                return ids.join(" -> ");
            }
            let _ = seen.insert(next, path.len());
            path.push(next);
            current = next;
        }

        path.iter().map(|&i| self.cases[i].id()).collect::<Vec<_>>().join(", ")
    }
}
