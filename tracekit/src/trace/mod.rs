//! Types for tracking the progression of a single request as it is handled
//! by the components that make up an application. A trace is a tree of spans
//! which represent individual units of work, tied together by a shared trace
//! id and parent/child span relationships.
//!
//! This module holds the immutable value types: identifiers, flags, and the
//! [`SpanContext`] that travels with every span. The mutable span itself,
//! the tracer that creates spans and the pipeline that exports them live in
//! the `tracekit-sdk` crate.

use std::time::Duration;
use thiserror::Error;

mod span_context;

pub use span_context::{SpanContext, SpanId, TraceFlags, TraceId};

/// Describe the result of operations in the tracing API.
pub type TraceResult<T> = Result<T, TraceError>;

/// Errors returned by the trace API.
///
/// The usage-error variants ([`TraceError::InvalidName`],
/// [`TraceError::AlreadyEnded`], [`TraceError::SpanEnded`]) indicate bugs in
/// the instrumented application and are reported synchronously to the caller
/// rather than silently swallowed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    /// A span was created with an empty name.
    #[error("span names must not be empty")]
    InvalidName,

    /// A span was ended a second time.
    #[error("span has already been ended")]
    AlreadyEnded,

    /// A span was mutated after it was ended.
    #[error("span is ended and can no longer be modified")]
    SpanEnded,

    /// Export failed to finish within the allotted period.
    #[error("exporting timed out after {} seconds", .0.as_secs())]
    ExportTimedOut(Duration),

    /// Other errors not covered by the variants above.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl From<String> for TraceError {
    fn from(err_msg: String) -> Self {
        TraceError::Other(Box::new(Custom(err_msg)))
    }
}

impl From<&'static str> for TraceError {
    fn from(err_msg: &'static str) -> Self {
        TraceError::Other(Box::new(Custom(err_msg.into())))
    }
}

/// Wrap type for string
#[derive(Error, Debug)]
#[error("{0}")]
struct Custom(String);
