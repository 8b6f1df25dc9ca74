//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit the startup banner and the per-request access log
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Access log is one `info` event per request with method, path, status, target

use std::time::Duration;

use axum::http::{Method, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ProxyConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> String {
    format!("dev_proxy={level},tower_http={level}")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Log the effective configuration once at startup.
pub fn log_banner(config: &ProxyConfig) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        static_root = %config.static_files.root.display(),
        primary = %config.backends.primary,
        decision = %config.backends.decision,
        "Development proxy starting"
    );
    for route in &config.routes {
        tracing::info!(prefix = %route.path_prefix, backend = %route.backend, "Route");
    }
    tracing::info!(
        api_prefixes = ?config.dispatch.api_prefixes,
        backend_timeout_secs = config.timeouts.backend_secs,
        max_body_size = config.limits.max_body_size,
        "Dispatch configured"
    );
}

/// One line per handled request.
pub fn log_access(
    request_id: &str,
    method: &Method,
    path: &str,
    status: StatusCode,
    target: &str,
    elapsed: Duration,
) {
    let latency_ms = elapsed.as_secs_f64() * 1000.0;
    if status.is_server_error() {
        tracing::warn!(request_id, %method, path, status = status.as_u16(), dispatch = target, latency_ms, "Request handled");
    } else {
        tracing::info!(request_id, %method, path, status = status.as_u16(), dispatch = target, latency_ms, "Request handled");
    }
}
