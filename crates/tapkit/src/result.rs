//! Result and error types for Tapkit.

use thiserror::Error;

/// Result type for Tapkit operations
pub type TapResult<T> = Result<T, TapError>;

/// Errors that can occur in Tapkit
///
/// Reporting itself never fails: a mismatch is a `not ok` line, not an
/// error. Only the capture buffer and diagnostics setup can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TapError {
    /// Growing the capture buffer failed
    #[error("Cannot grow capture buffer by {requested} bytes")]
    CaptureAllocation {
        /// Bytes the append needed
        requested: usize,
    },

    /// The capture buffer reached its configured limit
    #[error("Capture buffer limit of {limit} bytes exceeded")]
    CaptureLimitExceeded {
        /// Configured limit in bytes
        limit: usize,
    },

    /// Default diagnostics handlers could not be installed
    #[error("Failed to install diagnostics: {0}")]
    LoggingInit(String),
}
