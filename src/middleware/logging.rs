//! Request logging middleware
//!
//! Spans for every HTTP request plus a timing check that flags slow
//! handlers.

use std::time::{Duration, Instant};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{debug, warn, Level};

/// Requests slower than this are logged as warnings
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

/// Trace layer wrapping each request in an INFO span
pub fn http_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

/// Log request duration, warning on slow requests
pub async fn track_performance(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;
    let duration = start.elapsed();

    if duration > SLOW_REQUEST_THRESHOLD {
        warn!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Slow request"
        );
    } else {
        debug!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    }

    response
}
