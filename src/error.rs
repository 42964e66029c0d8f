//! Error types for padded transaction submission

use thiserror::Error;

/// Errors surfaced by the submission pipeline.
///
/// Each variant maps to a distinct failure point: configuration is checked
/// before any remote call, operation names are resolved at binding time, and
/// the two remote calls (estimate, then invoke) each have their own variant so
/// callers can tell whether a submission was ever attempted.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Operation {name} not found on contract interface")]
    OperationNotFound { name: String },

    #[error("Gas estimation failed: {0}")]
    EstimationFailed(String),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),
}

impl SubmitError {
    /// Check if error is safe to retry as-is.
    ///
    /// A failed estimation had no side effect, so the caller can simply call
    /// again. A failed submission may have been partially applied remotely;
    /// whether to retry it (with a larger margin or not) is the caller's
    /// decision.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::EstimationFailed(_))
    }

    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::InvalidConfiguration(_) => "invalid_configuration",
            SubmitError::OperationNotFound { .. } => "operation_not_found",
            SubmitError::EstimationFailed(_) => "estimation_failed",
            SubmitError::SubmissionFailed(_) => "submission_failed",
        }
    }
}

/// Result type for submission operations
pub type SubmitResult<T> = Result<T, SubmitError>;
