//! Reference tracing pipeline for the tracekit framework.
//!
//! This crate provides the concrete implementation of the `tracekit` API:
//! the [`trace::Tracer`] that creates spans, the [`trace::TracerProvider`]
//! pipeline controller that owns processors and exporters, the batching and
//! immediate span processors, and the B3 propagator used to carry trace
//! identity across process boundaries.
//!
//! ## Getting started
//!
//! ```
//! use tracekit::Context;
//! use tracekit_sdk::trace::{InMemorySpanExporter, TracerProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = InMemorySpanExporter::default();
//! let provider = TracerProvider::builder()
//!     .with_simple_exporter(exporter.clone())
//!     .build();
//!
//! let tracer = provider.tracer("example");
//! let mut span = tracer.start_with_context("operation", &Context::new())?;
//! span.end()?;
//!
//! assert_eq!(exporter.get_finished_spans()?.len(), 1);
//! provider.shutdown()?;
//! # Ok(())
//! # }
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
#![allow(clippy::needless_doctest_main)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

pub mod error;
pub mod propagation;
pub mod resource;
pub mod trace;

pub use resource::Resource;
