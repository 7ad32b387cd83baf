//! End-to-end pipeline scenarios: span trees through the batch pipeline and
//! trace identity carried across a process boundary as a B3 string.

use std::time::Duration;
use tracekit::Context;
use tracekit_sdk::propagation::B3Propagator;
use tracekit_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, InMemorySpanExporter, TracerProvider,
};
use tracekit_sdk::Resource;

fn batch_pipeline(exporter: InMemorySpanExporter) -> TracerProvider {
    let processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_queue_size(64)
                .with_max_batch_size(32)
                .with_scheduled_delay(Duration::from_secs(30))
                .build(),
        )
        .build();
    TracerProvider::builder()
        .with_span_processor(processor)
        .with_resource(Resource::builder().with_service_name("pipeline-test").build())
        .build()
}

#[test]
fn parent_and_child_span_share_one_trace() {
    let exporter = InMemorySpanExporter::default();
    let provider = batch_pipeline(exporter.clone());
    let tracer = provider.tracer("pipeline");

    let mut root = tracer.start_with_context("pipeline", &Context::new()).unwrap();
    let root_cx = tracer.context_with_span(&root, &Context::new());

    let mut child = tracer.start_with_context("job-a", &root_cx).unwrap();
    child.end().unwrap();
    root.end().unwrap();

    provider.force_flush().unwrap();

    let finished = exporter.get_finished_spans().unwrap();
    assert_eq!(finished.len(), 2);

    // Within a batch, end-notification order is preserved.
    let (job, pipeline) = (&finished[0], &finished[1]);
    assert_eq!(job.name, "job-a");
    assert_eq!(pipeline.name, "pipeline");

    assert_eq!(
        job.span_context.trace_id(),
        pipeline.span_context.trace_id()
    );
    assert_eq!(job.parent_span_id, pipeline.span_context.span_id());
    assert!(pipeline.parent_span_id == tracekit::trace::SpanId::INVALID);
    assert!(pipeline.end_time >= pipeline.start_time);

    provider.shutdown().unwrap();
}

#[test]
fn b3_string_carries_trace_identity_across_processes() {
    let propagator = B3Propagator::new();

    // Sending process: root span and a child whose context goes on the wire.
    let send_exporter = InMemorySpanExporter::default();
    let send_provider = batch_pipeline(send_exporter.clone());
    let send_tracer = send_provider.tracer("sender");

    let mut root = send_tracer
        .start_with_context("pipeline", &Context::new())
        .unwrap();
    let root_cx = send_tracer.context_with_span(&root, &Context::new());
    let mut child = send_tracer.start_with_context("send", &root_cx).unwrap();
    let child_cx = send_tracer.context_with_span(&child, &root_cx);

    let wire_value = propagator.inject_to_string(&child_cx);

    child.end().unwrap();
    root.end().unwrap();
    send_provider.force_flush().unwrap();

    // Receiving process: fresh pipeline, fresh context, same trace.
    let recv_exporter = InMemorySpanExporter::default();
    let recv_provider = batch_pipeline(recv_exporter.clone());
    let recv_tracer = recv_provider.tracer("receiver");

    let remote_cx = propagator.extract_from_str(&wire_value);
    let remote_context = remote_cx.span_context().expect("wire value must parse");
    assert!(remote_context.is_remote());

    let mut grandchild = recv_tracer
        .start_with_context("receive", &remote_cx)
        .unwrap();
    grandchild.end().unwrap();
    recv_provider.force_flush().unwrap();

    let sent = send_exporter.get_finished_spans().unwrap();
    let received = recv_exporter.get_finished_spans().unwrap();
    assert_eq!(received.len(), 1);

    let root_span = sent.iter().find(|s| s.name == "pipeline").unwrap();
    let child_span = sent.iter().find(|s| s.name == "send").unwrap();
    let grandchild_span = &received[0];

    assert_eq!(
        grandchild_span.span_context.trace_id(),
        root_span.span_context.trace_id()
    );
    assert_eq!(
        grandchild_span.parent_span_id,
        child_span.span_context.span_id()
    );
    // The sampling decision made at the root travels with the trace.
    assert!(grandchild_span.span_context.is_sampled());

    recv_provider.shutdown().unwrap();
}

#[test]
fn concurrent_children_of_one_context_get_distinct_span_ids() {
    let exporter = InMemorySpanExporter::default();
    let provider = batch_pipeline(exporter.clone());
    let tracer = provider.tracer("fanout");

    let mut parent = tracer.start_with_context("parent", &Context::new()).unwrap();
    let parent_cx = tracer.context_with_span(&parent, &Context::new());

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let tracer = tracer.clone();
            let parent_cx = parent_cx.clone();
            std::thread::spawn(move || {
                let mut span = tracer.start_with_context("task-c", &parent_cx).unwrap();
                span.end().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    parent.end().unwrap();
    provider.force_flush().unwrap();

    let finished = exporter.get_finished_spans().unwrap();
    assert_eq!(finished.len(), 4);

    let parent_data = finished.iter().find(|s| s.name == "parent").unwrap();
    let mut task_span_ids = Vec::new();
    for task in finished.iter().filter(|s| s.name == "task-c") {
        assert_eq!(
            task.span_context.trace_id(),
            parent_data.span_context.trace_id()
        );
        assert_eq!(task.parent_span_id, parent_data.span_context.span_id());
        task_span_ids.push(task.span_context.span_id());
    }
    task_span_ids.sort_by_key(|id| id.to_bytes());
    task_span_ids.dedup();
    assert_eq!(task_span_ids.len(), 3);

    provider.shutdown().unwrap();
}

#[test]
fn spans_ended_after_shutdown_are_dropped() {
    let exporter = InMemorySpanExporter::default();
    let provider = batch_pipeline(exporter.clone());
    let tracer = provider.tracer("late");

    let mut early = tracer.start_with_context("early", &Context::new()).unwrap();
    let mut late = tracer.start_with_context("late", &Context::new()).unwrap();

    early.end().unwrap();
    provider.force_flush().unwrap();
    assert_eq!(exporter.get_finished_spans().unwrap().len(), 1);

    provider.shutdown().unwrap();

    // Shutting down the batch pipeline clears the in-memory exporter, and
    // ends reported afterwards go nowhere.
    late.end().unwrap();
    assert!(exporter.get_finished_spans().unwrap().is_empty());
}
