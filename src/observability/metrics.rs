//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define request metrics (count, latency, auth rejections)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `routegate_requests_total` (counter): requests by method, status, mount
//! - `routegate_request_duration_seconds` (histogram): latency distribution
//! - `routegate_auth_rejections_total` (counter): 401s by router
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Labels for method, status code and mount prefix (bounded cardinality)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(
            address = %addr,
            error = %e,
            "Failed to install metrics exporter"
        ),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, mount: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("mount", mount.to_string()),
    ];
    metrics::counter!("routegate_requests_total", &labels).increment(1);
    metrics::histogram!("routegate_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request turned away by the bearer gate.
pub fn record_auth_rejection(router: &str) {
    metrics::counter!("routegate_auth_rejections_total", "router" => router.to_string())
        .increment(1);
}
