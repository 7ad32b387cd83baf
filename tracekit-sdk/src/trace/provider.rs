//! # Tracer Provider
//!
//! The `TracerProvider` is the pipeline controller: it owns the span
//! processors and the exporter(s) behind them, wires them to the tracers it
//! creates, and exposes the flush/shutdown contract the application uses
//! before exit.
//!
//! There is deliberately no process-global provider: a `TracerProvider` is
//! an explicitly constructed value, cheap to clone (clones share one
//! pipeline), passed by reference to whatever code needs to create tracers.
//!
//! ## Cloning and Shutdown
//!
//! Cloning a `TracerProvider` creates a new reference to the same pipeline,
//! not a new pipeline. Dropping the last reference triggers a best-effort
//! shutdown, flushing remaining spans; users who care about the outcome
//! should call [`shutdown`](TracerProvider::shutdown) explicitly. Once shut
//! down, span-end notifications are dropped (documented best-effort loss).
//!
//! # Examples
//!
//! ```
//! use tracekit::Context;
//! use tracekit_sdk::trace::{InMemorySpanExporter, TracerProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = InMemorySpanExporter::default();
//! let provider = TracerProvider::builder()
//!     .with_batch_exporter(exporter.clone())
//!     .build();
//!
//! let tracer = provider.tracer("app");
//! let mut span = tracer.start_with_context("work", &Context::new())?;
//! span.end()?;
//!
//! // Deliver the final batch before exit.
//! provider.force_flush()?;
//! provider.shutdown()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{SdkError, SdkResult};
use crate::resource::Resource;
use crate::trace::span_processor::{BatchSpanProcessor, SimpleSpanProcessor, SpanProcessor};
use crate::trace::{Config, IdGenerator, SpanExporter, Tracer};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracekit::{tracekit_debug, tracekit_info};

/// TracerProvider inner type
#[derive(Debug)]
pub(crate) struct TracerProviderInner {
    processors: Vec<Box<dyn SpanProcessor>>,
    config: Config,
    is_shutdown: AtomicBool,
}

impl TracerProviderInner {
    /// Shutdown every processor, called both from explicit shutdown and
    /// from `Drop` when the last reference is released.
    fn shutdown(&self) -> Vec<SdkResult> {
        let mut results = vec![];
        for processor in &self.processors {
            let result = processor.shutdown();
            if let Err(err) = &result {
                tracekit_debug!(
                    name: "TracerProvider.ShutdownError",
                    error = format!("{err}")
                );
            }
            results.push(result);
        }
        results
    }
}

impl Drop for TracerProviderInner {
    fn drop(&mut self) {
        if !self.is_shutdown.load(Ordering::Relaxed) {
            let _ = self.shutdown(); // errors are handled within shutdown
        }
    }
}

/// Creator and registry of named [`Tracer`] instances, and owner of the
/// processor/exporter pipeline behind them.
#[derive(Clone, Debug)]
pub struct TracerProvider {
    inner: Arc<TracerProviderInner>,
}

impl Default for TracerProvider {
    fn default() -> Self {
        TracerProvider::builder().build()
    }
}

impl TracerProvider {
    /// Create a new [`TracerProvider`] builder.
    pub fn builder() -> TracerProviderBuilder {
        TracerProviderBuilder::default()
    }

    /// Span processors associated with this provider.
    pub(crate) fn span_processors(&self) -> &[Box<dyn SpanProcessor>] {
        &self.inner.processors
    }

    /// Config associated with this provider.
    pub(crate) fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Create a [`Tracer`] with the given instrumentation scope name, e.g.
    /// the crate or module being instrumented.
    pub fn tracer(&self, name: impl Into<Cow<'static, str>>) -> Tracer {
        let name = name.into();
        if name.is_empty() {
            tracekit_info!(
                name: "TracerNameEmpty",
                message = "tracer created with an empty name; spans will carry an empty instrumentation name"
            );
        }
        Tracer::new(name, self.clone())
    }

    /// Force flush all remaining spans in span processors.
    ///
    /// After this returns `Ok`, every span that ended before the call has
    /// been included in some exporter invocation. This is the call an
    /// application makes before process exit to avoid losing the final
    /// batch.
    pub fn force_flush(&self) -> SdkResult {
        let results: Vec<_> = self
            .span_processors()
            .iter()
            .map(|processor| processor.force_flush())
            .collect();
        if results.iter().all(|r| r.is_ok()) {
            Ok(())
        } else {
            Err(SdkError::InternalFailure(format!(
                "flush errors: {:?}",
                results.into_iter().filter_map(Result::err).collect::<Vec<_>>()
            )))
        }
    }

    /// Shuts down this `TracerProvider`: flushes each processor once, then
    /// permanently stops the pipeline.
    ///
    /// Further span-end notifications are dropped after this returns.
    /// Calling `shutdown` a second time returns
    /// [`SdkError::AlreadyShutdown`].
    pub fn shutdown(&self) -> SdkResult {
        if self
            .inner
            .is_shutdown
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let results = self.inner.shutdown();

            if results.iter().all(|res| res.is_ok()) {
                Ok(())
            } else {
                Err(SdkError::InternalFailure(format!(
                    "shutdown errors: {:?}",
                    results.into_iter().filter_map(Result::err).collect::<Vec<_>>()
                )))
            }
        } else {
            Err(SdkError::AlreadyShutdown)
        }
    }
}

/// Builder for provider attributes.
#[derive(Debug, Default)]
pub struct TracerProviderBuilder {
    processors: Vec<Box<dyn SpanProcessor>>,
    config: Config,
}

impl TracerProviderBuilder {
    /// Adds a [SimpleSpanProcessor] with the configured exporter to the
    /// pipeline: every span is exported individually as soon as it ends.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_simple_exporter<T: SpanExporter + 'static>(self, exporter: T) -> Self {
        let simple = SimpleSpanProcessor::new(Box::new(exporter));
        self.with_span_processor(simple)
    }

    /// Adds a [BatchSpanProcessor] with the configured exporter to the
    /// pipeline: spans accumulate and are exported in batches from a
    /// background thread.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_batch_exporter<T: SpanExporter + 'static>(self, exporter: T) -> Self {
        let batch = BatchSpanProcessor::builder(exporter).build();
        self.with_span_processor(batch)
    }

    /// Adds a custom [SpanProcessor] to the pipeline.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_span_processor<T: SpanProcessor + 'static>(self, processor: T) -> Self {
        let mut processors = self.processors;
        processors.push(Box::new(processor));

        TracerProviderBuilder { processors, ..self }
    }

    /// Specify the id generator to be used.
    pub fn with_id_generator<T: IdGenerator + 'static>(mut self, id_generator: T) -> Self {
        self.config.id_generator = Box::new(id_generator);
        self
    }

    /// Associates a [Resource] with the provider.
    ///
    /// The resource represents the entity producing telemetry and is
    /// delivered to every exporter in the pipeline.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.config.resource = resource;
        self
    }

    /// Create a new provider from this configuration.
    pub fn build(self) -> TracerProvider {
        let config = self.config;
        let mut processors = self.processors;

        for processor in &mut processors {
            processor.set_resource(&config.resource);
        }

        TracerProvider {
            inner: Arc::new(TracerProviderInner {
                processors,
                config,
                is_shutdown: AtomicBool::new(false),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::InMemorySpanExporter;
    use tracekit::Context;

    #[test]
    fn shutdown_is_guarded_against_repeat_calls() {
        let provider = TracerProvider::builder()
            .with_simple_exporter(InMemorySpanExporter::default())
            .build();

        assert!(provider.shutdown().is_ok());
        assert_eq!(provider.shutdown(), Err(SdkError::AlreadyShutdown));
    }

    #[test]
    fn clones_share_one_pipeline() {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let clone = provider.clone();

        let tracer = clone.tracer("clone");
        tracer
            .start_with_context("work", &Context::new())
            .unwrap()
            .end()
            .unwrap();

        assert_eq!(exporter.get_finished_spans().unwrap().len(), 1);
        assert!(provider.shutdown().is_ok());
        assert_eq!(clone.shutdown(), Err(SdkError::AlreadyShutdown));
    }

    #[test]
    fn resource_reaches_the_exporter() {
        let exporter = InMemorySpanExporter::default();
        let resource = Resource::builder().with_service_name("svc").build();
        let _provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .with_resource(resource.clone())
            .build();

        assert_eq!(exporter.resource(), resource);
    }

    #[test]
    fn force_flush_aggregates_processor_results() {
        let provider = TracerProvider::builder()
            .with_simple_exporter(InMemorySpanExporter::default())
            .with_simple_exporter(InMemorySpanExporter::default())
            .build();

        assert!(provider.force_flush().is_ok());
    }
}
