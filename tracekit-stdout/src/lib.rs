//! Exporter that writes finished spans to stdout.
//!
//! Useful for development and as the logging variant of the exporter
//! matrix; pair it with a `SimpleSpanProcessor` to see spans as they end,
//! or with a `BatchSpanProcessor` to see them batch by batch.
//!
//! ```
//! use tracekit::Context;
//! use tracekit_sdk::trace::TracerProvider;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = TracerProvider::builder()
//!     .with_simple_exporter(tracekit_stdout::SpanExporter::default())
//!     .build();
//!
//! let tracer = provider.tracer("stdout-example");
//! let mut span = tracer.start_with_context("doing_work", &Context::new())?;
//! span.end()?;
//!
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

use chrono::{DateTime, Utc};
use core::fmt;
use futures_util::future::BoxFuture;
use std::sync::atomic;
use tracekit_sdk::error::SdkError;
use tracekit_sdk::resource::Resource;
use tracekit_sdk::trace::{ExportResult, SpanData};

/// An exporter that writes finished spans to stdout on export.
pub struct SpanExporter {
    resource: Resource,
    is_shutdown: atomic::AtomicBool,
    resource_emitted: bool,
}

impl fmt::Debug for SpanExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpanExporter")
    }
}

impl Default for SpanExporter {
    fn default() -> Self {
        SpanExporter {
            resource: Resource::default(),
            is_shutdown: atomic::AtomicBool::new(false),
            resource_emitted: false,
        }
    }
}

impl tracekit_sdk::trace::SpanExporter for SpanExporter {
    /// Write spans to stdout
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(atomic::Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(SdkError::AlreadyShutdown)));
        }

        if !self.resource_emitted {
            self.resource_emitted = true;
            println!("Resource");
            self.resource.iter().for_each(|kv| {
                println!("\t {}={:?}", kv.key, kv.value);
            });
        }
        print_spans(batch);

        Box::pin(std::future::ready(Ok(())))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, atomic::Ordering::SeqCst);
    }

    fn set_resource(&mut self, res: &Resource) {
        self.resource = res.clone();
    }
}

fn print_spans(batch: Vec<SpanData>) {
    for (i, span) in batch.into_iter().enumerate() {
        println!("Span #{}", i);
        println!("\t Instrumentation Scope: {:?}", span.instrumentation_name);
        println!("\t Name: {:?}", &span.name);
        println!("\t TraceId: {:?}", &span.span_context.trace_id());
        println!("\t SpanId: {:?}", &span.span_context.span_id());
        println!("\t ParentSpanId: {:?}", &span.parent_span_id);
        println!("\t Sampled: {}", span.span_context.is_sampled());

        let datetime: DateTime<Utc> = span.start_time.into();
        println!(
            "\t Start time: {}",
            datetime.format("%Y-%m-%d %H:%M:%S%.6f")
        );
        let datetime: DateTime<Utc> = span.end_time.into();
        println!("\t End time: {}", datetime.format("%Y-%m-%d %H:%M:%S%.6f"));

        let mut print_header = true;
        for kv in span.attributes.iter() {
            if print_header {
                println!("\t Attributes:");
                print_header = false;
            }
            println!("\t\t {}: {:?}", kv.key, kv.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use tracekit::trace::{SpanContext, SpanId, TraceFlags, TraceId};
    use tracekit_sdk::trace::SpanExporter as _;

    fn span_data() -> SpanData {
        SpanData {
            span_context: SpanContext::new(
                TraceId::from(1),
                SpanId::from(1),
                SpanId::INVALID,
                TraceFlags::SAMPLED,
                false,
            ),
            parent_span_id: SpanId::INVALID,
            name: Cow::Borrowed("stdout"),
            start_time: tracekit::time::now(),
            end_time: tracekit::time::now(),
            attributes: vec![tracekit::KeyValue::new("printed", true)],
            instrumentation_name: Cow::Borrowed("test"),
        }
    }

    #[test]
    fn export_succeeds_until_shutdown() {
        let mut exporter = super::SpanExporter::default();

        let result = futures_executor::block_on(exporter.export(vec![span_data()]));
        assert!(result.is_ok());

        exporter.shutdown();
        let result = futures_executor::block_on(exporter.export(vec![span_data()]));
        assert_eq!(result, Err(SdkError::AlreadyShutdown));
    }
}
