//! # Tracer
//!
//! The `Tracer` is responsible for creating spans and for deriving the
//! contexts that establish parent/child relationships between them. Tracers
//! are created by a [`TracerProvider`] and share its processors and
//! configuration.
//!
//! [`TracerProvider`]: crate::trace::TracerProvider

use crate::trace::provider::TracerProvider;
use crate::trace::span::{Span, SpanRecord};
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;
use tracekit::trace::{SpanContext, SpanId, TraceError, TraceFlags, TraceResult};
use tracekit::{time, Context, KeyValue};

/// `Tracer` implementation to create and manage spans
#[derive(Clone)]
pub struct Tracer {
    scope_name: Cow<'static, str>,
    provider: TracerProvider,
}

impl fmt::Debug for Tracer {
    /// Formats the `Tracer` using the given formatter.
    /// Omitting `provider` here is necessary to avoid cycles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("name", &self.scope_name)
            .finish()
    }
}

impl Tracer {
    /// Create a new tracer (used internally by `TracerProvider`s).
    pub(crate) fn new(scope_name: Cow<'static, str>, provider: TracerProvider) -> Self {
        Tracer {
            scope_name,
            provider,
        }
    }

    /// TracerProvider associated with this tracer.
    pub(crate) fn provider(&self) -> &TracerProvider {
        &self.provider
    }

    /// Name of the instrumentation scope this tracer was created for.
    pub(crate) fn scope_name(&self) -> &Cow<'static, str> {
        &self.scope_name
    }

    /// Starts a new span with the current thread's context as parent.
    ///
    /// See [`start_with_context`] for the parenting rules.
    ///
    /// [`start_with_context`]: Tracer::start_with_context
    pub fn start<T>(&self, name: T) -> TraceResult<Span>
    where
        T: Into<Cow<'static, str>>,
    {
        let name = name.into();
        Context::map_current(|cx| self.build_with_context(SpanBuilder::from_name(name), cx))
    }

    /// Starts a new span from an explicit parent context.
    ///
    /// Each span has zero or one parent spans and zero or more child spans,
    /// which represent causally related operations. A tree of related spans
    /// comprises a trace. A span is said to be a _root span_ if it does not
    /// have a parent; each trace includes a single root span, which is the
    /// shared ancestor of all other spans in the trace.
    ///
    /// If `parent_cx` carries a valid current span context, the new span
    /// reuses its trace id, records its span id as parent and inherits its
    /// sampling flag verbatim. Otherwise a fresh trace id is generated, the
    /// span has no parent and starts a new, sampled trace.
    ///
    /// The only error condition is an empty name, which is rejected with
    /// [`TraceError::InvalidName`].
    pub fn start_with_context<T>(&self, name: T, parent_cx: &Context) -> TraceResult<Span>
    where
        T: Into<Cow<'static, str>>,
    {
        self.build_with_context(SpanBuilder::from_name(name), parent_cx)
    }

    /// Creates a span builder for a span with the given name.
    pub fn span_builder<T>(&self, name: T) -> SpanBuilder
    where
        T: Into<Cow<'static, str>>,
    {
        SpanBuilder::from_name(name)
    }

    /// Starts a span from a [`SpanBuilder`].
    pub fn build_with_context(
        &self,
        mut builder: SpanBuilder,
        parent_cx: &Context,
    ) -> TraceResult<Span> {
        if builder.name.is_empty() {
            return Err(TraceError::InvalidName);
        }

        let provider = self.provider();
        let config = provider.config();
        let span_id = config.id_generator.new_span_id();

        let (trace_id, parent_span_id, trace_flags) =
            match parent_cx.span_context().filter(|sc| sc.is_valid()) {
                Some(parent) => (parent.trace_id(), parent.span_id(), parent.trace_flags()),
                // No parent: this span starts a new trace, and the root
                // sampling decision is made here.
                None => (
                    config.id_generator.new_trace_id(),
                    SpanId::INVALID,
                    TraceFlags::SAMPLED,
                ),
            };

        let span_context =
            SpanContext::new(trace_id, span_id, parent_span_id, trace_flags, false);

        let span = Span::new(
            span_context,
            SpanRecord {
                name: builder.name,
                start_time: builder.start_time.unwrap_or_else(time::now),
                attributes: builder.attributes.take().unwrap_or_default(),
            },
            self.clone(),
        );

        for processor in provider.span_processors() {
            processor.on_start(&span, parent_cx);
        }

        Ok(span)
    }

    /// Returns a new context based on `parent_cx` with `span`'s context set
    /// as current.
    ///
    /// This is a pure function of its inputs and the only way to obtain a
    /// context for creating children of `span`; `parent_cx` itself is never
    /// mutated.
    pub fn context_with_span(&self, span: &Span, parent_cx: &Context) -> Context {
        parent_cx.with_span_context(span.span_context().clone())
    }
}

/// `SpanBuilder` allows span attributes to be configured before the span
/// has started.
///
/// ```
/// use tracekit::Context;
/// use tracekit::KeyValue;
/// use tracekit_sdk::trace::TracerProvider;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = TracerProvider::builder().build();
/// let tracer = provider.tracer("example");
///
/// let span = tracer
///     .span_builder("job")
///     .with_attributes([KeyValue::new("job.id", 7_i64)])
///     .start_with_context(&tracer, &Context::new())?;
/// # drop(span);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SpanBuilder {
    /// Span name
    pub name: Cow<'static, str>,
    /// Span start time, wall clock now if unset
    pub start_time: Option<SystemTime>,
    /// Span attributes
    pub attributes: Option<Vec<KeyValue>>,
}

impl SpanBuilder {
    /// Create a new span builder from a span name.
    pub fn from_name<T: Into<Cow<'static, str>>>(name: T) -> Self {
        SpanBuilder {
            name: name.into(),
            start_time: None,
            attributes: None,
        }
    }

    /// Assign the start time.
    pub fn with_start_time<T: Into<SystemTime>>(self, start_time: T) -> Self {
        SpanBuilder {
            start_time: Some(start_time.into()),
            ..self
        }
    }

    /// Assign the initial attributes.
    pub fn with_attributes<I>(self, attributes: I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        SpanBuilder {
            attributes: Some(attributes.into_iter().collect()),
            ..self
        }
    }

    /// Builds a span with the current thread's context as parent.
    pub fn start(self, tracer: &Tracer) -> TraceResult<Span> {
        Context::map_current(|cx| tracer.build_with_context(self, cx))
    }

    /// Builds a span from an explicit parent context.
    pub fn start_with_context(self, tracer: &Tracer, parent_cx: &Context) -> TraceResult<Span> {
        tracer.build_with_context(self, parent_cx)
    }
}
