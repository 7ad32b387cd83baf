use crate::error::{SdkError, SdkResult};
use crate::resource::Resource;
use crate::trace::{SpanData, SpanExporter};
use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex};

/// An in-memory span exporter that stores span data in memory.
///
/// This exporter is useful for testing and debugging purposes. Finished
/// spans can be retrieved with [`get_finished_spans`]; clones share the same
/// storage, so a clone kept by the test observes everything the pipeline
/// exports.
///
/// [`get_finished_spans`]: InMemorySpanExporter::get_finished_spans
///
/// # Example
///
/// ```
/// use tracekit::Context;
/// use tracekit_sdk::trace::{InMemorySpanExporter, TracerProvider};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let exporter = InMemorySpanExporter::default();
/// let provider = TracerProvider::builder()
///     .with_batch_exporter(exporter.clone())
///     .build();
///
/// let tracer = provider.tracer("example");
/// let mut span = tracer.start_with_context("say hello", &Context::new())?;
/// span.end()?;
///
/// provider.force_flush()?;
///
/// for span in exporter.get_finished_spans()? {
///     println!("{:?}", span);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InMemorySpanExporter {
    spans: Arc<Mutex<Vec<SpanData>>>,
    resource: Arc<Mutex<Resource>>,
}

impl Default for InMemorySpanExporter {
    fn default() -> Self {
        InMemorySpanExporterBuilder::new().build()
    }
}

/// Builder for [`InMemorySpanExporter`].
///
/// # Example
///
/// ```
/// use tracekit_sdk::trace::InMemorySpanExporterBuilder;
///
/// let exporter = InMemorySpanExporterBuilder::new().build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemorySpanExporterBuilder {}

impl InMemorySpanExporterBuilder {
    /// Creates a new instance of the `InMemorySpanExporterBuilder`.
    pub fn new() -> Self {
        Self {}
    }

    /// Creates a new instance of the `InMemorySpanExporter`.
    pub fn build(&self) -> InMemorySpanExporter {
        InMemorySpanExporter {
            spans: Arc::new(Mutex::new(Vec::new())),
            resource: Arc::new(Mutex::new(Resource::default())),
        }
    }
}

impl InMemorySpanExporter {
    /// Returns the finished spans as a vector of `SpanData`.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock cannot be acquired.
    pub fn get_finished_spans(&self) -> Result<Vec<SpanData>, SdkError> {
        Ok(self.spans.lock()?.clone())
    }

    /// Clears the internal storage of finished spans.
    pub fn reset(&self) {
        if let Ok(mut spans_guard) = self.spans.lock() {
            spans_guard.clear();
        }
    }

    /// The resource this exporter was installed with.
    pub fn resource(&self) -> Resource {
        self.resource
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| Resource::empty())
    }
}

impl SpanExporter for InMemorySpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, SdkResult> {
        let result = self
            .spans
            .lock()
            .map(|mut spans_guard| spans_guard.extend(batch))
            .map_err(SdkError::from);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.reset();
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Ok(mut guard) = self.resource.lock() {
            *guard = resource.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use tracekit::trace::{SpanContext, SpanId, TraceFlags, TraceId};

    fn span_data(name: &str) -> SpanData {
        SpanData {
            span_context: SpanContext::new(
                TraceId::from(1),
                SpanId::from(1),
                SpanId::INVALID,
                TraceFlags::SAMPLED,
                false,
            ),
            parent_span_id: SpanId::INVALID,
            name: Cow::Owned(name.to_string()),
            start_time: tracekit::time::now(),
            end_time: tracekit::time::now(),
            attributes: Vec::new(),
            instrumentation_name: Cow::Borrowed("test"),
        }
    }

    #[test]
    fn clones_share_storage() {
        let exporter = InMemorySpanExporter::default();
        let mut clone = exporter.clone();

        futures_executor::block_on(clone.export(vec![span_data("a"), span_data("b")])).unwrap();

        assert_eq!(exporter.get_finished_spans().unwrap().len(), 2);
        exporter.reset();
        assert!(clone.get_finished_spans().unwrap().is_empty());
    }
}
