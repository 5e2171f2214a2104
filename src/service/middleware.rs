//! Request middleware: correlation ids and per-request metrics events.
//!
//! Every request gets a correlation id (taken from the `x-trace-id`
//! header when the caller supplies one, freshly generated otherwise)
//! and one structured log event with method, normalized path, status,
//! and latency. There is no separate metrics system; these events are
//! the metrics.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use regex_lite::Regex;
use tracing::{info, info_span, Instrument};

/// Correlation id attached to the request extensions, for handlers to
/// echo into error responses.
#[derive(Debug, Clone)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// From the `x-trace-id` header, or a fresh v4 UUID.
    fn from_request(request: &Request) -> Self {
        let id = request
            .headers()
            .get("x-trace-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        CorrelationId(id)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-request middleware: installs the correlation id and emits one
/// structured metrics event when the response is ready.
pub async fn metrics_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let correlation = CorrelationId::from_request(&request);
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    request.extensions_mut().insert(correlation.clone());

    let span = info_span!(
        "request",
        trace_id = %correlation.as_str(),
        method = %method,
        path = %path,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    );

    let response = next.run(request).instrument(span.clone()).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    span.record("status", status);
    span.record("latency_ms", latency.as_millis() as u64);

    info!(
        target: "structure_pipeline::metrics",
        metric_type = "request",
        trace_id = %correlation.as_str(),
        method = %method,
        path = %path,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request completed"
    );

    response
}

/// Normalize a path for metrics to avoid high cardinality: UUID
/// segments become `:id`.
fn normalize_path(path: &str) -> String {
    let uuid_segment = Regex::new(
        r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    )
    .expect("uuid segment pattern");
    uuid_segment.replace_all(path, ":id").to_string()
}
