//! Errors returned by pipeline lifecycle operations.

use std::sync::PoisonError;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for pipeline operations such as export,
/// flush and shutdown.
pub type SdkResult = Result<(), SdkError>;

/// Errors returned by pipeline components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdkError {
    /// Shutdown was already invoked on this component.
    #[error("shutdown already invoked")]
    AlreadyShutdown,

    /// The operation failed to complete within the allotted period.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The operation failed for a component-internal reason, e.g. a
    /// transport failure inside an exporter. The failure is reported for
    /// observability purposes; failed batches are not retried.
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl<T> From<PoisonError<T>> for SdkError {
    fn from(err: PoisonError<T>) -> Self {
        SdkError::InternalFailure(err.to_string())
    }
}
