//! Startup orchestration.
//!
//! # Responsibilities
//! - Start optional background services (metrics endpoint)
//! - Build the server from the validated configuration
//! - Bind the listener and begin accepting traffic
//! - Wire OS signals to graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the proxy until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let server = HttpServer::new(config.clone())?;

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    logging::log_banner(&config);
    if !config.static_files.root.is_dir() {
        tracing::warn!(
            root = %config.static_files.root.display(),
            "Static root is not a directory; every static request will 404"
        );
    }

    let address = format!("{}:{}", config.listener.bind_address, config.listener.port);
    let listener = TcpListener::bind((config.listener.bind_address.as_str(), config.listener.port))
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
