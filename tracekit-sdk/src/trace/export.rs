//! Span exporters.

use crate::error::SdkResult;
use crate::resource::Resource;
use futures_util::future::BoxFuture;
use std::borrow::Cow;
use std::fmt::Debug;
use std::time::SystemTime;
use tracekit::trace::{SpanContext, SpanId};
use tracekit::KeyValue;

/// Describes the result of an export.
pub type ExportResult = SdkResult;

/// `SpanExporter` defines the interface that protocol-specific exporters
/// must implement so that they can be plugged into the tracing pipeline and
/// support sending span data to a backend.
///
/// The goal of the interface is to minimize the burden of implementation for
/// protocol-dependent exporters. An exporter is expected to be primarily a
/// simple telemetry data encoder and transmitter; the wire protocol it
/// speaks is not part of this contract.
pub trait SpanExporter: Send + Sync + Debug {
    /// Exports a batch of readable spans. Protocol exporters that implement
    /// this function are typically expected to serialize and transmit the
    /// data to the destination.
    ///
    /// This function will never be called concurrently for the same exporter
    /// instance, and it receives a detached copy of the batch so new spans
    /// can continue accumulating during transmission.
    ///
    /// Any retry logic that is required by the exporter is the
    /// responsibility of the exporter; the built-in processors report a
    /// failed outcome for observability and drop the batch.
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult>;

    /// Shuts down the exporter. After the call to `shutdown`, subsequent
    /// calls to `export` are not allowed and should return an error.
    fn shutdown(&mut self) {}

    /// A hint that the export of any spans the exporter has received prior
    /// to the call should be completed as soon as possible, preferably
    /// before returning from this method.
    fn force_flush(&mut self) -> BoxFuture<'static, ExportResult> {
        Box::pin(std::future::ready(Ok(())))
    }

    /// Set the resource describing the entity that produces the spans this
    /// exporter receives. Called once, when the exporter is installed into a
    /// pipeline.
    fn set_resource(&mut self, _resource: &Resource) {}
}

/// `SpanData` contains all the information collected by a span and is the
/// standard input handed to exporters once the span has ended.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanData {
    /// Exportable `SpanContext`
    pub span_context: SpanContext,
    /// Span parent id, `SpanId::INVALID` for root spans
    pub parent_span_id: SpanId,
    /// Span name
    pub name: Cow<'static, str>,
    /// Span start time
    pub start_time: SystemTime,
    /// Span end time
    pub end_time: SystemTime,
    /// Span attributes, in insertion order
    pub attributes: Vec<KeyValue>,
    /// Name of the tracer that produced this span
    pub instrumentation_name: Cow<'static, str>,
}
