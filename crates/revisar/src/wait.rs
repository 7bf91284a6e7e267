//! Wait engine: deterministic polling over an eventually-consistent page.
//!
//! A rendered page converges on its final state some unknown time after an
//! action; the wait engine is the sole mechanism the harness uses to
//! tolerate that. It repeatedly evaluates a probe until the probe yields a
//! value or a wall-clock timeout elapses, sleeping one poll interval
//! between attempts. Transient faults (element not in the DOM yet, stale
//! handle) count as "not ready"; anything else propagates immediately.

use crate::result::{RevisarError, RevisarResult};
use std::time::{Duration, Instant};

/// Default timeout for hard waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Timeout and polling cadence for a wait. Pure description, no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A configured wait, ready to run probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wait {
    options: WaitOptions,
}

impl Wait {
    /// Create a wait with the given options
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// The options this wait runs with
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `probe` until it yields a value or the window closes.
    ///
    /// The probe returns `Ok(Some(value))` when the condition holds,
    /// `Ok(None)` when it does not hold yet. A transient error
    /// ([`RevisarError::is_transient`]) is treated exactly like
    /// `Ok(None)`; any other error propagates immediately.
    ///
    /// Timeout accounting is wall-clock, not attempt-count, so a slow
    /// execution environment cannot starve the condition of its window,
    /// but at least `floor(timeout / poll_interval)` attempts are made
    /// before `Timeout` is declared, so a fast environment cannot
    /// under-poll either. The loop never sleeps less than one poll
    /// interval between attempts.
    ///
    /// # Errors
    ///
    /// `Timeout` once the window closes, or the probe's own non-transient
    /// error.
    pub fn until<T, F>(&self, mut probe: F) -> RevisarResult<T>
    where
        F: FnMut() -> RevisarResult<Option<T>>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();
        let min_attempts = if self.options.poll_interval_ms == 0 {
            1
        } else {
            (self.options.timeout_ms / self.options.poll_interval_ms).max(1)
        };

        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            match probe() {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) if e.is_transient() => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() >= timeout && attempts >= min_attempts {
                return Err(RevisarError::Timeout {
                    ms: self.options.timeout_ms,
                });
            }
            std::thread::sleep(poll_interval);
        }
    }

    /// Poll a boolean predicate until it returns true.
    ///
    /// # Errors
    ///
    /// `Timeout` if the predicate never becomes true within the window.
    pub fn until_true<F>(&self, mut predicate: F) -> RevisarResult<()>
    where
        F: FnMut() -> bool,
    {
        self.until(|| Ok(predicate().then_some(())))
    }
}

/// Wait for a predicate with explicit timing, no `Wait` value needed.
pub fn wait_until<F>(predicate: F, timeout_ms: u64, poll_interval_ms: u64) -> RevisarResult<()>
where
    F: FnMut() -> bool,
{
    Wait::new(
        WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(poll_interval_ms),
    )
    .until_true(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builders_and_accessors() {
            let opts = WaitOptions::new().with_timeout(1500).with_poll_interval(25);
            assert_eq!(opts.timeout(), Duration::from_millis(1500));
            assert_eq!(opts.poll_interval(), Duration::from_millis(25));
        }
    }

    mod wait_tests {
        use super::*;

        fn wait(timeout_ms: u64, poll_ms: u64) -> Wait {
            Wait::new(
                WaitOptions::new()
                    .with_timeout(timeout_ms)
                    .with_poll_interval(poll_ms),
            )
        }

        #[test]
        fn test_immediate_success_returns_value() {
            let result = wait(100, 10).until(|| Ok(Some(42)));
            assert_eq!(result.unwrap(), 42);
        }

        #[test]
        fn test_always_pending_times_out() {
            let result: RevisarResult<()> = wait(100, 10).until(|| Ok(None));
            match result {
                Err(RevisarError::Timeout { ms }) => assert_eq!(ms, 100),
                other => panic!("expected Timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_transient_fault_is_swallowed_until_success() {
            let calls = AtomicU64::new(0);
            let result = wait(500, 10).until(|| {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(RevisarError::ElementNotFound {
                        locator: "css=.late".into(),
                    })
                } else {
                    Ok(Some("rendered"))
                }
            });
            assert_eq!(result.unwrap(), "rendered");
            assert!(calls.load(Ordering::SeqCst) >= 4);
        }

        #[test]
        fn test_non_transient_fault_propagates_immediately() {
            let calls = AtomicU64::new(0);
            let result: RevisarResult<()> = wait(500, 10).until(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RevisarError::session("browser crashed"))
            });
            assert!(matches!(result, Err(RevisarError::SessionError { .. })));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_timeout_makes_minimum_attempts() {
            // poll 100ms, timeout 300ms: at least 3 polls before Timeout
            let calls = Arc::new(AtomicU64::new(0));
            let calls_probe = calls.clone();
            let start = Instant::now();
            let result: RevisarResult<()> = wait(300, 100).until(move || {
                calls_probe.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            });
            let elapsed = start.elapsed();

            assert!(matches!(result, Err(RevisarError::Timeout { .. })));
            assert!(calls.load(Ordering::SeqCst) >= 3);
            // ±1 poll interval around the 300ms window
            assert!(elapsed >= Duration::from_millis(300));
            assert!(elapsed < Duration::from_millis(600));
        }

        #[test]
        fn test_success_at_150ms_returns_within_one_poll() {
            // predicate true at t=150ms, poll 50ms, timeout 1000ms:
            // success no earlier than t, no later than t + poll interval
            let flag = Arc::new(AtomicBool::new(false));
            let flag_bg = flag.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(150));
                flag_bg.store(true, Ordering::SeqCst);
            });

            let start = Instant::now();
            let result = wait(1000, 50).until_true(|| flag.load(Ordering::SeqCst));
            let elapsed = start.elapsed();

            assert!(result.is_ok());
            assert!(elapsed >= Duration::from_millis(150), "woke early: {elapsed:?}");
            // one poll interval, with slack for scheduler jitter
            assert!(elapsed < Duration::from_millis(400), "woke late: {elapsed:?}");
        }

        #[test]
        fn test_never_busy_spins_faster_than_poll_interval() {
            let calls = AtomicU64::new(0);
            let start = Instant::now();
            let _: RevisarResult<()> = wait(200, 50).until(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            });
            let elapsed = start.elapsed().as_millis() as u64;
            // attempts are bounded by elapsed / poll + 1 initial attempt
            assert!(calls.load(Ordering::SeqCst) <= elapsed / 50 + 2);
        }
    }

    mod convenience_tests {
        use super::*;

        #[test]
        fn test_wait_until_success() {
            assert!(wait_until(|| true, 100, 10).is_ok());
        }

        #[test]
        fn test_wait_until_timeout() {
            assert!(wait_until(|| false, 100, 10).is_err());
        }
    }
}
