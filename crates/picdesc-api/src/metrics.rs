//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "picdesc_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "picdesc_http_request_duration_seconds";

    // Vendor call metrics
    pub const VISION_REQUESTS_TOTAL: &str = "picdesc_vision_requests_total";
    pub const VISION_REQUEST_DURATION_SECONDS: &str = "picdesc_vision_request_duration_seconds";

    // Description metrics
    pub const DESCRIPTIONS_GENERATED_TOTAL: &str = "picdesc_descriptions_generated_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "picdesc_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one call to the vendor annotation API.
pub fn record_vision_request(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::VISION_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::VISION_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one generated description.
pub fn record_description_generated() {
    counter!(names::DESCRIPTIONS_GENERATED_TOTAL).increment(1);
}

/// Record a rate limit rejection.
pub fn record_rate_limit_hit(path: &str) {
    let labels = [("path", path.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Middleware recording request counts and latency.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
