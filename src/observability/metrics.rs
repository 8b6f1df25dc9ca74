//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, target
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_backend_failures_total` (counter): synthesized failures by backend, kind
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, target: &'static str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "target" => target
    )
    .increment(1);
    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string(),
        "target" => target
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_failure(backend: &'static str, kind: &'static str) {
    metrics::counter!(
        "proxy_backend_failures_total",
        "backend" => backend,
        "kind" => kind
    )
    .increment(1);
}
