//! # Span Processor Interface
//!
//! Span processors are hooks invoked when spans start and end. The built-in
//! processors decide when finished spans are handed to the configured
//! [`SpanExporter`]: [`SimpleSpanProcessor`] forwards each span as soon as
//! it ends, [`BatchSpanProcessor`] decouples span completion from network
//! export by accumulating spans and flushing them from a background thread.
//!
//! Span processors are registered on a [`TracerProvider`] and invoked in
//! registration order; all tracers created by one provider share them.
//!
//! ```ascii
//!   +-----+--------------+   +-----------------------+   +-------------------+
//!   |     |              |   |                       |   |                   |
//!   |     |              |   | (Batch)SpanProcessor  |   |    SpanExporter   |
//!   |     |              +---> (Simple)SpanProcessor +--->  (StdoutExporter) |
//!   |     |              |   |                       |   |                   |
//!   | SDK | Tracer.span()|   +-----------------------+   +-------------------+
//!   |     | Span.end()   |
//!   |     |              |
//!   +-----+--------------+
//! ```
//!
//! [`TracerProvider`]: crate::trace::TracerProvider

use crate::error::{SdkError, SdkResult};
use crate::resource::Resource;
use crate::trace::export::{SpanData, SpanExporter};
use crate::trace::Span;
use futures_executor::block_on;
use std::cmp::min;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{sync_channel, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use std::{env, str::FromStr};
use tracekit::{tracekit_debug, tracekit_warn, Context};

/// Delay interval between two consecutive exports.
pub(crate) const TRACEKIT_BSP_SCHEDULE_DELAY: &str = "TRACEKIT_BSP_SCHEDULE_DELAY";
/// Default delay interval between two consecutive exports.
pub(crate) const TRACEKIT_BSP_SCHEDULE_DELAY_DEFAULT: u64 = 3_000;
/// Maximum queue size.
pub(crate) const TRACEKIT_BSP_MAX_QUEUE_SIZE: &str = "TRACEKIT_BSP_MAX_QUEUE_SIZE";
/// Default maximum queue size.
pub(crate) const TRACEKIT_BSP_MAX_QUEUE_SIZE_DEFAULT: usize = 2_048;
/// Maximum batch size, must be less than or equal to the maximum queue size.
pub(crate) const TRACEKIT_BSP_MAX_BATCH_SIZE: &str = "TRACEKIT_BSP_MAX_BATCH_SIZE";
/// Default maximum batch size.
pub(crate) const TRACEKIT_BSP_MAX_BATCH_SIZE_DEFAULT: usize = 512;
/// Maximum allowed time to wait for a flush or shutdown to complete.
pub(crate) const TRACEKIT_BSP_EXPORT_TIMEOUT: &str = "TRACEKIT_BSP_EXPORT_TIMEOUT";
/// Default maximum allowed time to wait for a flush or shutdown to complete.
pub(crate) const TRACEKIT_BSP_EXPORT_TIMEOUT_DEFAULT: u64 = 5_000;

/// `SpanProcessor` is an interface which allows hooks for span start and
/// end method invocations.
pub trait SpanProcessor: Send + Sync + std::fmt::Debug {
    /// `on_start` is called when a span is started. This method is called
    /// synchronously on the thread that started the span, therefore it
    /// should not block.
    fn on_start(&self, span: &Span, cx: &Context);
    /// `on_end` is called after a span is ended (i.e., the end timestamp is
    /// already set). This method is called synchronously within the
    /// `Span::end` API, therefore it should not block.
    fn on_end(&self, span: SpanData);
    /// Force the spans lying in the cache to be exported.
    fn force_flush(&self) -> SdkResult;
    /// Shuts down the processor. Called when the pipeline is shut down.
    /// This is an opportunity for the processor to do any cleanup required.
    fn shutdown(&self) -> SdkResult;
    /// Set the resource for the span processor.
    fn set_resource(&mut self, _resource: &Resource) {}
}

/// A [SpanProcessor] that passes finished spans to the configured
/// [`SpanExporter`] as soon as they are finished, without any batching. This
/// is typically useful for debugging and testing. For scenarios requiring
/// higher performance/throughput, consider using [BatchSpanProcessor].
#[derive(Debug)]
pub struct SimpleSpanProcessor {
    exporter: Mutex<Box<dyn SpanExporter>>,
}

impl SimpleSpanProcessor {
    /// Create a new [SimpleSpanProcessor] using the provided exporter.
    pub fn new(exporter: Box<dyn SpanExporter>) -> Self {
        Self {
            exporter: Mutex::new(exporter),
        }
    }
}

impl SpanProcessor for SimpleSpanProcessor {
    fn on_start(&self, _span: &Span, _cx: &Context) {
        // Ignored
    }

    fn on_end(&self, span: SpanData) {
        if !span.span_context.is_sampled() {
            return;
        }

        let result = self
            .exporter
            .lock()
            .map_err(SdkError::from)
            .and_then(|mut exporter| block_on(exporter.export(vec![span])));

        if let Err(err) = result {
            tracekit_debug!(
                name: "SimpleSpanProcessor.OnEnd.Error",
                reason = format!("{:?}", err)
            );
        }
    }

    fn force_flush(&self) -> SdkResult {
        // Nothing buffered in a simple span processor.
        Ok(())
    }

    fn shutdown(&self) -> SdkResult {
        let mut exporter = self.exporter.lock()?;
        exporter.shutdown();
        Ok(())
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Ok(mut exporter) = self.exporter.lock() {
            exporter.set_resource(resource);
        }
    }
}

/// Messages exchanged between the producer side and the background thread.
#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
enum BatchMessage {
    ExportSpan(SpanData),
    ForceFlush(SyncSender<SdkResult>),
    Shutdown(SyncSender<SdkResult>),
    SetResource(Resource),
}

/// A [SpanProcessor] that accumulates finished spans and exports them in
/// batches from a dedicated background thread.
///
/// A batch is closed and handed to the exporter when it reaches
/// `max_batch_size` or when `scheduled_delay` elapses, whichever comes
/// first, so ending a span never blocks on network I/O. The producer side
/// is a bounded channel of capacity `max_queue_size`; when the channel is
/// full the newest spans are dropped and counted rather than blocking the
/// application.
#[derive(Debug)]
pub struct BatchSpanProcessor {
    message_sender: SyncSender<BatchMessage>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    forceflush_timeout: Duration,
    shutdown_timeout: Duration,
    is_shutdown: AtomicBool,
    dropped_spans_count: Arc<AtomicUsize>,
}

impl BatchSpanProcessor {
    /// Creates a new instance of `BatchSpanProcessor` with the given
    /// configuration.
    pub fn new<E>(mut exporter: E, config: BatchConfig) -> Self
    where
        E: SpanExporter + 'static,
    {
        let (message_sender, message_receiver) = sync_channel(config.max_queue_size);
        let export_timeout = config.export_timeout;

        let handle = thread::Builder::new()
            .name("tracekit-span-batcher".to_string())
            .spawn(move || {
                let mut batch: Vec<SpanData> = Vec::with_capacity(config.max_batch_size);
                let mut last_export_time = Instant::now();

                loop {
                    let timeout = config
                        .scheduled_delay
                        .saturating_sub(last_export_time.elapsed());
                    match message_receiver.recv_timeout(timeout) {
                        Ok(BatchMessage::ExportSpan(span)) => {
                            batch.push(span);
                            if batch.len() >= config.max_batch_size {
                                export_batch(&mut exporter, &mut batch);
                                last_export_time = Instant::now();
                            }
                        }
                        Ok(BatchMessage::ForceFlush(sender)) => {
                            let result = try_export_batch(&mut exporter, &mut batch);
                            let _ = sender.send(result);
                            last_export_time = Instant::now();
                        }
                        Ok(BatchMessage::Shutdown(sender)) => {
                            let result = try_export_batch(&mut exporter, &mut batch);
                            exporter.shutdown();
                            let _ = sender.send(result);
                            break;
                        }
                        Ok(BatchMessage::SetResource(resource)) => {
                            exporter.set_resource(&resource);
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            export_batch(&mut exporter, &mut batch);
                            last_export_time = Instant::now();
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            // All producer handles are gone; flush what is
                            // left and stop.
                            export_batch(&mut exporter, &mut batch);
                            break;
                        }
                    }
                }
            })
            .expect("failed to spawn tracekit-span-batcher thread");

        Self {
            message_sender,
            handle: Mutex::new(Some(handle)),
            forceflush_timeout: export_timeout,
            shutdown_timeout: export_timeout,
            is_shutdown: AtomicBool::new(false),
            dropped_spans_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a builder for a `BatchSpanProcessor` around the given
    /// exporter.
    pub fn builder<E>(exporter: E) -> BatchSpanProcessorBuilder<E>
    where
        E: SpanExporter + 'static,
    {
        BatchSpanProcessorBuilder {
            exporter,
            config: BatchConfig::default(),
        }
    }
}

/// Export the accumulated batch, reporting failures through the internal
/// diagnostics rather than to the producer.
fn export_batch<E: SpanExporter>(exporter: &mut E, batch: &mut Vec<SpanData>) {
    if let Err(err) = try_export_batch(exporter, batch) {
        tracekit_warn!(
            name: "BatchSpanProcessor.ExportError",
            reason = format!("{:?}", err)
        );
    }
}

fn try_export_batch<E: SpanExporter>(exporter: &mut E, batch: &mut Vec<SpanData>) -> SdkResult {
    if batch.is_empty() {
        return Ok(());
    }
    block_on(exporter.export(batch.split_off(0)))
}

impl SpanProcessor for BatchSpanProcessor {
    fn on_start(&self, _span: &Span, _cx: &Context) {
        // Ignored
    }

    fn on_end(&self, span: SpanData) {
        if !span.span_context.is_sampled() {
            return;
        }
        if self.is_shutdown.load(Ordering::Relaxed) {
            // Spans ended after shutdown are dropped, best effort.
            tracekit_debug!(name: "BatchSpanProcessor.OnEnd.AfterShutdown");
            return;
        }

        let result = self.message_sender.try_send(BatchMessage::ExportSpan(span));

        if result.is_err() {
            // Warn on the first dropped span only; the exact count of
            // dropped spans is reported once at shutdown.
            if self.dropped_spans_count.fetch_add(1, Ordering::Relaxed) == 0 {
                tracekit_warn!(
                    name: "BatchSpanProcessor.SpanDroppingStarted",
                    message = "span queue full; dropping newest spans until the queue drains"
                );
            }
        }
    }

    fn force_flush(&self) -> SdkResult {
        if self.is_shutdown.load(Ordering::Relaxed) {
            return Err(SdkError::AlreadyShutdown);
        }
        let (sender, receiver) = sync_channel(1);
        self.message_sender
            .try_send(BatchMessage::ForceFlush(sender))
            .map_err(|err| SdkError::InternalFailure(format!("failed to request flush: {err}")))?;

        receiver
            .recv_timeout(self.forceflush_timeout)
            .map_err(|_| SdkError::Timeout(self.forceflush_timeout))?
    }

    fn shutdown(&self) -> SdkResult {
        if self.is_shutdown.swap(true, Ordering::Relaxed) {
            return Err(SdkError::AlreadyShutdown);
        }

        let dropped_spans = self.dropped_spans_count.load(Ordering::Relaxed);
        if dropped_spans > 0 {
            tracekit_warn!(
                name: "BatchSpanProcessor.DroppedSpans",
                dropped_spans = dropped_spans
            );
        }

        let (sender, receiver) = sync_channel(1);
        self.message_sender
            .try_send(BatchMessage::Shutdown(sender))
            .map_err(|err| {
                SdkError::InternalFailure(format!("failed to request shutdown: {err}"))
            })?;

        let result = receiver
            .recv_timeout(self.shutdown_timeout)
            .map_err(|_| SdkError::Timeout(self.shutdown_timeout))?;

        if let Ok(mut handle) = self.handle.lock() {
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    return Err(SdkError::InternalFailure(
                        "span batcher thread panicked during shutdown".to_string(),
                    ));
                }
            }
        }

        result
    }

    fn set_resource(&mut self, resource: &Resource) {
        let _ = self
            .message_sender
            .try_send(BatchMessage::SetResource(resource.clone()));
    }
}

/// Builder for [`BatchSpanProcessor`].
#[derive(Debug, Default)]
pub struct BatchSpanProcessorBuilder<E>
where
    E: SpanExporter + 'static,
{
    exporter: E,
    config: BatchConfig,
}

impl<E> BatchSpanProcessorBuilder<E>
where
    E: SpanExporter + 'static,
{
    /// Set the [`BatchConfig`] for this builder.
    pub fn with_batch_config(self, config: BatchConfig) -> Self {
        BatchSpanProcessorBuilder { config, ..self }
    }

    /// Build a new instance of `BatchSpanProcessor`.
    pub fn build(self) -> BatchSpanProcessor {
        BatchSpanProcessor::new(self.exporter, self.config)
    }
}

/// Batch span processor configuration.
/// Use [`BatchConfigBuilder`] to configure your own instance of
/// [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfig {
    /// The maximum queue size to buffer spans for delayed processing. If
    /// the queue gets full it drops the spans. The default value is 2048.
    pub(crate) max_queue_size: usize,

    /// The delay interval between two consecutive processing of batches.
    /// The default value is 3 seconds.
    pub(crate) scheduled_delay: Duration,

    /// The maximum number of spans to process in a single batch. Reaching
    /// this size closes and exports the batch immediately, without waiting
    /// for the delay interval. The default value is 512.
    pub(crate) max_batch_size: usize,

    /// The maximum duration a flush or shutdown caller waits for the
    /// exporter to acknowledge completion.
    pub(crate) export_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfigBuilder::default().build()
    }
}

/// A builder for creating [`BatchConfig`] instances.
#[derive(Debug)]
pub struct BatchConfigBuilder {
    max_queue_size: usize,
    scheduled_delay: Duration,
    max_batch_size: usize,
    export_timeout: Duration,
}

impl Default for BatchConfigBuilder {
    /// Create a new [`BatchConfigBuilder`] initialized with the default
    /// batch config values. The values are overridden by environment
    /// variables if set:
    /// * `TRACEKIT_BSP_MAX_QUEUE_SIZE`
    /// * `TRACEKIT_BSP_SCHEDULE_DELAY`
    /// * `TRACEKIT_BSP_MAX_BATCH_SIZE`
    /// * `TRACEKIT_BSP_EXPORT_TIMEOUT`
    fn default() -> Self {
        BatchConfigBuilder {
            max_queue_size: TRACEKIT_BSP_MAX_QUEUE_SIZE_DEFAULT,
            scheduled_delay: Duration::from_millis(TRACEKIT_BSP_SCHEDULE_DELAY_DEFAULT),
            max_batch_size: TRACEKIT_BSP_MAX_BATCH_SIZE_DEFAULT,
            export_timeout: Duration::from_millis(TRACEKIT_BSP_EXPORT_TIMEOUT_DEFAULT),
        }
        .init_from_env_vars()
    }
}

impl BatchConfigBuilder {
    /// Set the maximum queue size to buffer spans for delayed processing.
    /// If the queue gets full it drops the spans.
    /// The default value is 2048.
    pub fn with_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Set the maximum number of spans to process in a single batch.
    /// The default value is 512.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Set the delay interval between two consecutive processing of
    /// batches. The default value is 3000 milliseconds.
    pub fn with_scheduled_delay(mut self, scheduled_delay: Duration) -> Self {
        self.scheduled_delay = scheduled_delay;
        self
    }

    /// Set the maximum duration a flush or shutdown caller waits for the
    /// exporter to acknowledge. The default value is 5000 milliseconds.
    pub fn with_export_timeout(mut self, export_timeout: Duration) -> Self {
        self.export_timeout = export_timeout;
        self
    }

    /// Builds a `BatchConfig` enforcing the following invariants:
    /// * `max_batch_size` must be less than or equal to `max_queue_size`.
    pub fn build(self) -> BatchConfig {
        let max_batch_size = min(self.max_batch_size, self.max_queue_size);

        BatchConfig {
            max_queue_size: self.max_queue_size,
            scheduled_delay: self.scheduled_delay,
            export_timeout: self.export_timeout,
            max_batch_size,
        }
    }

    fn init_from_env_vars(mut self) -> Self {
        if let Some(max_queue_size) = env::var(TRACEKIT_BSP_MAX_QUEUE_SIZE)
            .ok()
            .and_then(|queue_size| usize::from_str(&queue_size).ok())
        {
            self.max_queue_size = max_queue_size;
        }

        if let Some(scheduled_delay) = env::var(TRACEKIT_BSP_SCHEDULE_DELAY)
            .ok()
            .and_then(|delay| u64::from_str(&delay).ok())
        {
            self.scheduled_delay = Duration::from_millis(scheduled_delay);
        }

        if let Some(max_batch_size) = env::var(TRACEKIT_BSP_MAX_BATCH_SIZE)
            .ok()
            .and_then(|batch_size| usize::from_str(&batch_size).ok())
        {
            self.max_batch_size = max_batch_size;
        }

        if let Some(export_timeout) = env::var(TRACEKIT_BSP_EXPORT_TIMEOUT)
            .ok()
            .and_then(|timeout| u64::from_str(&timeout).ok())
        {
            self.export_timeout = Duration::from_millis(export_timeout);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::InMemorySpanExporter;
    use std::borrow::Cow;
    use tracekit::trace::{SpanContext, SpanId, TraceFlags, TraceId};

    fn sampled_span_data(name: &str) -> SpanData {
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

    /// Poll the exporter until `expected` spans arrive or the deadline
    /// passes, so timing-sensitive assertions don't rely on a single sleep.
    fn wait_for_spans(exporter: &InMemorySpanExporter, expected: usize, deadline: Duration) {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if exporter.get_finished_spans().unwrap().len() >= expected {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn simple_processor_on_end_calls_export() {
        let exporter = InMemorySpanExporter::default();
        let processor = SimpleSpanProcessor::new(Box::new(exporter.clone()));
        let span_data = sampled_span_data("simple");

        processor.on_end(span_data.clone());

        assert_eq!(exporter.get_finished_spans().unwrap()[0], span_data);
        let _result = processor.shutdown();
    }

    #[test]
    fn simple_processor_skips_unsampled_spans() {
        let exporter = InMemorySpanExporter::default();
        let processor = SimpleSpanProcessor::new(Box::new(exporter.clone()));

        let mut unsampled = sampled_span_data("unsampled");
        unsampled.span_context = SpanContext::new(
            unsampled.span_context.trace_id(),
            unsampled.span_context.span_id(),
            SpanId::INVALID,
            TraceFlags::NOT_SAMPLED,
            false,
        );
        processor.on_end(unsampled);

        assert!(exporter.get_finished_spans().unwrap().is_empty());
    }

    #[test]
    fn batch_processor_flushes_on_schedule() {
        let exporter = InMemorySpanExporter::default();
        let config = BatchConfigBuilder::default()
            .with_max_queue_size(10)
            .with_max_batch_size(10)
            .with_scheduled_delay(Duration::from_millis(100))
            .build();
        let processor = BatchSpanProcessor::new(exporter.clone(), config);

        processor.on_end(sampled_span_data("scheduled"));

        wait_for_spans(&exporter, 1, Duration::from_secs(3));
        let finished = exporter.get_finished_spans().unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].name, "scheduled");

        processor.shutdown().unwrap();
    }

    #[test]
    fn full_batch_exports_without_waiting_for_the_timer() {
        let exporter = InMemorySpanExporter::default();
        let config = BatchConfigBuilder::default()
            .with_max_queue_size(10)
            .with_max_batch_size(2)
            // A delay long enough that a timer-driven flush cannot be
            // mistaken for the size-driven one.
            .with_scheduled_delay(Duration::from_secs(30))
            .build();
        let processor = BatchSpanProcessor::new(exporter.clone(), config);

        processor.on_end(sampled_span_data("first"));
        processor.on_end(sampled_span_data("second"));

        wait_for_spans(&exporter, 2, Duration::from_secs(3));
        assert_eq!(exporter.get_finished_spans().unwrap().len(), 2);

        processor.shutdown().unwrap();
    }

    #[test]
    fn force_flush_exports_buffered_spans() {
        let exporter = InMemorySpanExporter::default();
        let config = BatchConfigBuilder::default()
            .with_max_queue_size(10)
            .with_max_batch_size(10)
            .with_scheduled_delay(Duration::from_secs(30))
            .build();
        let processor = BatchSpanProcessor::new(exporter.clone(), config);

        for i in 0..3 {
            let mut span = sampled_span_data("flush");
            span.attributes
                .push(tracekit::KeyValue::new("index", i as i64));
            processor.on_end(span);
        }

        processor.force_flush().unwrap();

        // Everything ended before the flush call is in the exporter, once.
        assert_eq!(exporter.get_finished_spans().unwrap().len(), 3);

        processor.shutdown().unwrap();
    }

    #[test]
    fn shutdown_flushes_and_rejects_further_use() {
        let exporter = InMemorySpanExporter::default();
        let config = BatchConfigBuilder::default()
            .with_max_queue_size(10)
            .with_max_batch_size(10)
            .with_scheduled_delay(Duration::from_secs(30))
            .build();
        let processor = BatchSpanProcessor::new(exporter.clone(), config);

        processor.on_end(sampled_span_data("last"));
        processor.shutdown().unwrap();

        // The pending span was flushed on shutdown; note the in-memory
        // exporter clears its storage when it is shut down itself, so read
        // through the count recorded before reset is not possible here —
        // instead verify the second shutdown is rejected and later spans
        // are dropped silently.
        assert_eq!(processor.shutdown(), Err(SdkError::AlreadyShutdown));
        assert_eq!(processor.force_flush(), Err(SdkError::AlreadyShutdown));
        processor.on_end(sampled_span_data("after-shutdown"));
    }

    #[test]
    fn default_config_uses_three_second_delay() {
        let env_vars = vec![
            TRACEKIT_BSP_SCHEDULE_DELAY,
            TRACEKIT_BSP_MAX_QUEUE_SIZE,
            TRACEKIT_BSP_MAX_BATCH_SIZE,
            TRACEKIT_BSP_EXPORT_TIMEOUT,
        ];

        let config = temp_env::with_vars_unset(env_vars, BatchConfig::default);

        assert_eq!(config.scheduled_delay, Duration::from_millis(3_000));
        assert_eq!(config.max_queue_size, 2_048);
        assert_eq!(config.max_batch_size, 512);
        assert_eq!(config.export_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn config_is_overridable_by_env_vars() {
        let env_vars = vec![
            (TRACEKIT_BSP_SCHEDULE_DELAY, Some("2000")),
            (TRACEKIT_BSP_MAX_QUEUE_SIZE, Some("4096")),
            (TRACEKIT_BSP_MAX_BATCH_SIZE, Some("1024")),
            (TRACEKIT_BSP_EXPORT_TIMEOUT, Some("60000")),
        ];

        let config = temp_env::with_vars(env_vars, BatchConfig::default);

        assert_eq!(config.scheduled_delay, Duration::from_millis(2000));
        assert_eq!(config.max_queue_size, 4096);
        assert_eq!(config.max_batch_size, 1024);
        assert_eq!(config.export_timeout, Duration::from_millis(60000));
    }

    #[test]
    fn batch_size_is_clamped_to_queue_size() {
        let config = BatchConfigBuilder::default()
            .with_max_queue_size(256)
            .with_max_batch_size(1024)
            .build();

        assert_eq!(config.max_queue_size, 256);
        assert_eq!(config.max_batch_size, 256);
    }
}
