//! Harness configuration.
//!
//! One value carries everything the synchronization layer needs to know
//! about an environment: where the application lives and how patient the
//! waits should be. Soft queries run on a shorter window than hard waits
//! so that a probe for "is the error banner up?" does not stall a case
//! for the full navigation timeout.

use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

/// Default application base URL for local runs
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default soft-query window (3 seconds)
pub const DEFAULT_SOFT_TIMEOUT_MS: u64 = 3_000;

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Configuration for a harness run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Application base URL, no trailing slash
    pub base_url: String,
    /// Hard-wait timeout in milliseconds (actions, page loads)
    pub wait_timeout_ms: u64,
    /// Soft-query timeout in milliseconds (bounded state probes)
    pub soft_timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            soft_timeout_ms: DEFAULT_SOFT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with defaults, honoring the `BASE_URL` environment
    /// variable when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the hard-wait timeout
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait_timeout_ms = timeout_ms;
        self
    }

    /// Set the soft-query timeout
    #[must_use]
    pub const fn with_soft_timeout(mut self, timeout_ms: u64) -> Self {
        self.soft_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Absolute URL for a path under the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Wait options for hard waits
    #[must_use]
    pub const fn hard_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for soft queries
    #[must_use]
    pub const fn soft_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.soft_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}
