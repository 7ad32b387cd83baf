//! # B3 Propagator
//!
//! The `B3Propagator` serializes a [`Context`]'s current span context to a
//! single compact string and parses it back at process boundaries:
//!
//! ```text
//! {trace_id}-{span_id}-{sampling_state}[-{parent_span_id}]
//! ```
//!
//! with fixed-width lowercase hex ids (32 chars for the trace id, 16 for
//! span ids) and a one-digit sampling flag. The parent segment is present
//! only for contexts whose span has a parent.
//!
//! Extraction is fail-open by policy: malformed input of any kind yields the
//! root context rather than an error, because a missing trace link must
//! never break the receiving request handler. A context without a current
//! span injects the bare flag `0`, which receivers treat exactly like a
//! parse failure.

use std::sync::OnceLock;
use tracekit::propagation::{text_map_propagator::FieldIter, Extractor, Injector, TextMapPropagator};
use tracekit::trace::{SpanContext, SpanId, TraceFlags, TraceId};
use tracekit::Context;

const B3_SINGLE_HEADER: &str = "b3";

fn b3_fields() -> &'static [String; 1] {
    static FIELDS: OnceLock<[String; 1]> = OnceLock::new();
    FIELDS.get_or_init(|| [B3_SINGLE_HEADER.to_string()])
}

/// Extracts and injects `SpanContext`s as single-header B3 strings.
#[derive(Clone, Debug, Default)]
pub struct B3Propagator {
    _private: (),
}

impl B3Propagator {
    /// Create a new `B3Propagator`.
    pub fn new() -> Self {
        B3Propagator::default()
    }

    /// Encode the current span context of `cx` as a B3 string.
    ///
    /// Attach the returned string to the outgoing request by whatever
    /// transport-specific channel is appropriate (header, payload field,
    /// message attribute). If `cx` has no valid current span context the
    /// sentinel `"0"` is produced.
    pub fn inject_to_string(&self, cx: &Context) -> String {
        match cx.span_context().filter(|sc| sc.is_valid()) {
            Some(span_context) => {
                let mut value = format!(
                    "{:032x}-{:016x}-{}",
                    span_context.trace_id(),
                    span_context.span_id(),
                    if span_context.is_sampled() { "1" } else { "0" }
                );
                if span_context.has_parent() {
                    value.push_str(&format!("-{:016x}", span_context.parent_span_id()));
                }
                value
            }
            None => "0".to_string(),
        }
    }

    /// Decode a B3 string into a [`Context`].
    ///
    /// Malformed input (wrong segment count, non-hex characters, wrong id
    /// widths, zero ids, bad flag) degrades to the root context; this never
    /// fails.
    pub fn extract_from_str(&self, value: &str) -> Context {
        match self.decode(value) {
            Ok(span_context) => Context::new().with_span_context(span_context),
            Err(()) => Context::new(),
        }
    }

    /// Extract trace id from a hex encoded `&str` value.
    fn extract_trace_id(&self, trace_id: &str) -> Result<TraceId, ()> {
        // Only allow fixed-width lower case hex.
        if trace_id.len() != 32 || !is_lower_hex(trace_id) {
            return Err(());
        }
        TraceId::from_hex(trace_id).map_err(|_| ())
    }

    /// Extract span id from a hex encoded `&str` value.
    fn extract_span_id(&self, span_id: &str) -> Result<SpanId, ()> {
        if span_id.len() != 16 || !is_lower_hex(span_id) {
            return Err(());
        }
        SpanId::from_hex(span_id).map_err(|_| ())
    }

    /// Extract the sampled state from a `&str` value.
    fn extract_sampled_state(&self, sampled: &str) -> Result<TraceFlags, ()> {
        match sampled {
            "0" => Ok(TraceFlags::NOT_SAMPLED),
            "1" => Ok(TraceFlags::SAMPLED),
            _ => Err(()),
        }
    }

    fn decode(&self, value: &str) -> Result<SpanContext, ()> {
        let parts = value.split_terminator('-').collect::<Vec<&str>>();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(());
        }

        let trace_id = self.extract_trace_id(parts[0])?;
        let span_id = self.extract_span_id(parts[1])?;
        let trace_flags = self.extract_sampled_state(parts[2])?;
        let parent_span_id = if parts.len() == 4 {
            self.extract_span_id(parts[3])?
        } else {
            SpanId::INVALID
        };

        let span_context =
            SpanContext::new(trace_id, span_id, parent_span_id, trace_flags, true);

        // Zero ids are the reserved "absent" values.
        if !span_context.is_valid() {
            return Err(());
        }

        Ok(span_context)
    }
}

fn is_lower_hex(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl TextMapPropagator for B3Propagator {
    /// Encodes the values of the `Context` and injects them into the
    /// `Injector` under the `b3` key.
    fn inject_context(&self, cx: &Context, injector: &mut dyn Injector) {
        injector.set(B3_SINGLE_HEADER, self.inject_to_string(cx));
    }

    /// Retrieves encoded data using the provided `Extractor`. If no data for
    /// this format was retrieved OR if the retrieved data is invalid, then
    /// the given `Context` is returned unchanged.
    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context {
        let header_value = extractor.get(B3_SINGLE_HEADER).unwrap_or_default();
        match self.decode(header_value.as_ref()) {
            Ok(span_context) => cx.with_span_context(span_context),
            Err(()) => cx.clone(),
        }
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(b3_fields().as_ref())
    }
}
