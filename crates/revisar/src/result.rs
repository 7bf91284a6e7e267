//! Result and error types for Revisar.

use thiserror::Error;

/// Result type for Revisar operations
pub type RevisarResult<T> = Result<T, RevisarError>;

/// Errors that can occur in Revisar
#[derive(Debug, Error)]
pub enum RevisarError {
    /// No DOM node matched a locator at lookup time
    #[error("No element matching {locator} in the current page")]
    ElementNotFound {
        /// Locator that failed to match
        locator: String,
    },

    /// Element was located but rejected the action (disabled, obscured, stale)
    #[error("Element {locator} rejected interaction: {message}")]
    Interaction {
        /// Locator of the offending element
        locator: String,
        /// Reason the action was rejected
        message: String,
    },

    /// A wait predicate never succeeded within its window
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// The test case dependency graph contains a cycle
    #[error("Cyclic test dependency: {cycle}")]
    CyclicDependency {
        /// Ids participating in the cycle, in graph order
        cycle: String,
    },

    /// Driver/transport-level failure; fatal for the remaining run
    #[error("Browser session error: {message}")]
    SessionError {
        /// Error message from the driver
        message: String,
    },

    /// Semantic element name absent from the page's injected element map
    #[error("No locator registered under the name '{name}'")]
    UnknownElement {
        /// The missing semantic name
        name: String,
    },

    /// A test case registered under an id that already exists
    #[error("Duplicate test case id '{id}'")]
    DuplicateCase {
        /// The colliding id
        id: String,
    },

    /// A case-body assertion did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },
}

impl RevisarError {
    /// Whether a wait loop may swallow this fault and keep polling.
    ///
    /// Transient faults are the two a half-rendered page produces: the node
    /// is not in the DOM yet, or a handle went stale between resolution and
    /// use. Everything else propagates out of the wait immediately.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::Interaction { .. }
        )
    }

    /// Whether this fault invalidates the whole session rather than one case.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionError { .. })
    }

    /// Shorthand for a session-level failure.
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::SessionError {
            message: message.into(),
        }
    }

    /// Shorthand for a failed assertion.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }
}
