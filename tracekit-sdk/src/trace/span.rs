//! # Span
//!
//! `Span`s represent a single operation within a trace. `Span`s can be
//! nested to form a trace tree. Each trace contains a root span, which
//! typically describes the end-to-end latency and, optionally, one or more
//! sub-spans for its sub-operations.
//!
//! A `Span`'s start time is set on creation and its end time on [`end`];
//! attributes can be added in between. Ending the span turns it into an
//! immutable [`SpanData`] snapshot that is handed to the pipeline's span
//! processors; from that point on the span can no longer be modified.
//!
//! [`end`]: Span::end

use crate::trace::export::SpanData;
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;
use tracekit::trace::{SpanContext, TraceError, TraceResult};
use tracekit::{time, KeyValue};

/// Single operation within a trace.
pub struct Span {
    span_context: SpanContext,
    data: Option<SpanRecord>,
    tracer: crate::trace::Tracer,
}

/// Mutable state of a started span, taken out when the span ends.
#[derive(Clone, Debug)]
pub(crate) struct SpanRecord {
    pub(crate) name: Cow<'static, str>,
    pub(crate) start_time: SystemTime,
    pub(crate) attributes: Vec<KeyValue>,
}

impl Span {
    pub(crate) fn new(
        span_context: SpanContext,
        data: SpanRecord,
        tracer: crate::trace::Tracer,
    ) -> Self {
        Span {
            span_context,
            data: Some(data),
            tracer,
        }
    }

    /// Returns the `SpanContext` for the given `Span`.
    pub fn span_context(&self) -> &SpanContext {
        &self.span_context
    }

    /// Returns `true` while the span can still record information, i.e.
    /// until it is ended.
    pub fn is_recording(&self) -> bool {
        self.data.is_some()
    }

    /// Sets a single attribute on this span.
    ///
    /// Attributes are kept in insertion order; setting an attribute with an
    /// already-used key appends rather than overwrites, and consumers see
    /// both entries.
    ///
    /// Returns [`TraceError::SpanEnded`] if the span has already been ended;
    /// mutating a finished span indicates an instrumentation bug.
    pub fn set_attribute(&mut self, attribute: KeyValue) -> TraceResult<()> {
        match &mut self.data {
            Some(data) => {
                data.attributes.push(attribute);
                Ok(())
            }
            None => Err(TraceError::SpanEnded),
        }
    }

    /// Sets multiple attributes on this span.
    ///
    /// Returns [`TraceError::SpanEnded`] if the span has already been ended.
    pub fn set_attributes(
        &mut self,
        attributes: impl IntoIterator<Item = KeyValue>,
    ) -> TraceResult<()> {
        match &mut self.data {
            Some(data) => {
                data.attributes.extend(attributes);
                Ok(())
            }
            None => Err(TraceError::SpanEnded),
        }
    }

    /// Signals that the operation described by this span has now ended.
    ///
    /// The first call stamps the end time, freezes the span into a readable
    /// snapshot and hands it to the pipeline's processors. A second call
    /// returns [`TraceError::AlreadyEnded`]: double-ending signals a defect
    /// in the instrumented application and is reported rather than silently
    /// ignored.
    pub fn end(&mut self) -> TraceResult<()> {
        self.end_with_timestamp(time::now())
    }

    /// Signals that the operation described by this span ended at the given
    /// time.
    pub fn end_with_timestamp(&mut self, timestamp: SystemTime) -> TraceResult<()> {
        let data = self.data.take().ok_or(TraceError::AlreadyEnded)?;

        let span_data = SpanData {
            span_context: self.span_context.clone(),
            parent_span_id: self.span_context.parent_span_id(),
            name: data.name,
            start_time: data.start_time,
            end_time: timestamp,
            attributes: data.attributes,
            instrumentation_name: self.tracer.scope_name().clone(),
        };

        let processors = self.tracer.provider().span_processors();
        if let [processor] = processors {
            processor.on_end(span_data);
        } else {
            for processor in processors {
                processor.on_end(span_data.clone());
            }
        }

        Ok(())
    }
}

impl Drop for Span {
    /// Ends the span on drop if it was not ended explicitly, so spans still
    /// report when the owning scope unwinds. Dropping is best-effort and
    /// never an error.
    fn drop(&mut self) {
        if self.data.is_some() {
            let _ = self.end_with_timestamp(time::now());
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("span_context", &self.span_context)
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::trace::{InMemorySpanExporter, TracerProvider};
    use tracekit::trace::TraceError;
    use tracekit::{Context, KeyValue};

    fn test_pipeline() -> (InMemorySpanExporter, TracerProvider) {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (exporter, provider)
    }

    #[test]
    fn ending_twice_is_rejected() {
        let (exporter, provider) = test_pipeline();
        let tracer = provider.tracer("test");

        let mut span = tracer
            .start_with_context("operation", &Context::new())
            .unwrap();
        assert!(span.is_recording());
        assert!(span.end().is_ok());
        assert!(!span.is_recording());
        assert!(matches!(span.end(), Err(TraceError::AlreadyEnded)));

        // Only the successful end reached the exporter.
        assert_eq!(exporter.get_finished_spans().unwrap().len(), 1);
    }

    #[test]
    fn attributes_are_rejected_after_end() {
        let (exporter, provider) = test_pipeline();
        let tracer = provider.tracer("test");

        let mut span = tracer
            .start_with_context("operation", &Context::new())
            .unwrap();
        span.set_attribute(KeyValue::new("before", true)).unwrap();
        span.end().unwrap();

        assert!(matches!(
            span.set_attribute(KeyValue::new("after", true)),
            Err(TraceError::SpanEnded)
        ));

        let finished = exporter.get_finished_spans().unwrap();
        assert_eq!(finished[0].attributes, vec![KeyValue::new("before", true)]);
    }

    #[test]
    fn attribute_order_is_preserved() {
        let (exporter, provider) = test_pipeline();
        let tracer = provider.tracer("test");

        let mut span = tracer
            .start_with_context("operation", &Context::new())
            .unwrap();
        span.set_attribute(KeyValue::new("first", 1_i64)).unwrap();
        span.set_attributes([
            KeyValue::new("second", 2_i64),
            KeyValue::new("third", 3_i64),
        ])
        .unwrap();
        span.end().unwrap();

        let finished = exporter.get_finished_spans().unwrap();
        let keys: Vec<_> = finished[0]
            .attributes
            .iter()
            .map(|kv| kv.key.as_str().to_string())
            .collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn dropping_a_started_span_reports_it() {
        let (exporter, provider) = test_pipeline();
        let tracer = provider.tracer("test");

        let span = tracer
            .start_with_context("dropped", &Context::new())
            .unwrap();
        drop(span);

        let finished = exporter.get_finished_spans().unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].name, "dropped");
        assert!(finished[0].end_time >= finished[0].start_time);
    }
}
