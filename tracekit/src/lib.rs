//! Core API types for the tracekit distributed tracing framework.
//!
//! This crate holds the value types shared by every part of a tracing
//! pipeline: identifiers ([`trace::TraceId`], [`trace::SpanId`]), the
//! immutable [`trace::SpanContext`] that ties a span to its trace, the
//! immutable [`Context`] used to establish parent/child relationships, the
//! attribute types ([`Key`], [`Value`], [`KeyValue`]) and the carrier
//! interfaces used by propagators at process boundaries.
//!
//! The concrete tracer, processors and exporters live in the `tracekit-sdk`
//! crate; this crate deliberately contains no I/O and no mutable shared
//! state beyond the thread-current context.
//!
//! ## Getting started
//!
//! ```
//! use tracekit::{Context, KeyValue};
//!
//! // Contexts are immutable; deriving never mutates the parent.
//! #[derive(Debug, PartialEq)]
//! struct Deadline(u64);
//!
//! let cx = Context::new().with_value(Deadline(30));
//! assert_eq!(cx.get::<Deadline>(), Some(&Deadline(30)));
//! ```
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod common;
mod context;

#[doc(hidden)]
mod internal_logging;

pub mod propagation;
pub mod time;
pub mod trace;

pub use common::{Key, KeyValue, StringValue, Value};
pub use context::{Context, ContextGuard, FutureExt, WithContext};

#[cfg(feature = "internal-logs")]
#[doc(hidden)]
pub mod _private {
    pub use tracing::{debug, error, info, warn};
}
