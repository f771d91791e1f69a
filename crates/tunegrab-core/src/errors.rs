//! Progress pipeline error types.
//!
//! None of these cross the public session boundary: the session turns them
//! into a fallback `error` event. They exist so internal steps can use `?`.

use thiserror::Error;

/// Failure while turning a tick into an outward event.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ProgressError {
    /// A numeric field came out NaN or infinite.
    #[error("non-finite value for '{field}': {value}")]
    NonFinite {
        /// Field name on the outward event.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A percentage fell outside `[0, 100]`.
    #[error("percentage '{field}' out of range: {value}")]
    OutOfRange {
        /// Field name on the outward event.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Collection bookkeeping broke an invariant.
    #[error("collection state invariant violated: {0}")]
    StateInvariant(String),

    /// A panic was caught at the session boundary.
    #[error("progress pipeline panicked: {0}")]
    Panicked(String),
}

impl ProgressError {
    /// Message suitable for the `message` field of a fallback event.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Error formatting progress: {self}")
    }
}

/// Convenience result type for progress assembly.
pub type ProgressResult<T> = Result<T, ProgressError>;
