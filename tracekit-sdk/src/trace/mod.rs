//! # Trace Pipeline
//!
//! The tracing pipeline consists of a few main structs:
//!
//! * The [`Tracer`] struct which performs all tracing operations.
//! * The [`Span`] struct which is a mutable object storing information
//!   about the current operation execution.
//! * The [`TracerProvider`] struct which configures and produces
//!   [`Tracer`]s and owns the processor/exporter pipeline behind them.

mod config;
mod export;
mod id_generator;
mod in_memory_exporter;
mod provider;
mod span;
mod span_processor;
mod tracer;

pub use config::Config;
pub use export::{ExportResult, SpanData, SpanExporter};
pub use id_generator::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use in_memory_exporter::{InMemorySpanExporter, InMemorySpanExporterBuilder};
pub use provider::{TracerProvider, TracerProviderBuilder};
pub use span::Span;
pub use span_processor::{
    BatchConfig, BatchConfigBuilder, BatchSpanProcessor, BatchSpanProcessorBuilder,
    SimpleSpanProcessor, SpanProcessor,
};
pub use tracer::{SpanBuilder, Tracer};
