//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, request ID, overall timeout)
//! - Bind server to listener, one task per connection
//! - Dispatch requests: preflight, static files, or proxy
//! - Access log and metrics per request

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::http::proxy::Forwarder;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{method_not_allowed, not_found, preflight_response};
use crate::http::static_files::StaticFiles;
use crate::observability::{logging, metrics};
use crate::routing::{Dispatch, Dispatcher, RouteTable};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub routes: Arc<RouteTable>,
    pub forwarder: Arc<Forwarder>,
    pub static_files: StaticFiles,
}

impl AppState {
    /// Build state from a validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let routes = RouteTable::from_config(&config.backends, &config.routes)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(config.dispatch.api_prefixes.iter().cloned())),
            routes: Arc::new(routes),
            forwarder: Arc::new(Forwarder::new(
                Duration::from_secs(config.timeouts.backend_secs),
                config.limits.max_body_size,
            )),
            static_files: StaticFiles::new(&config.static_files.root),
        })
    }
}

/// HTTP server for the development proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires (or its sender goes away).
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Single entry point for every request.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().to_string();

    let (target, response) = match state.dispatcher.classify(&method, &path) {
        Dispatch::Preflight => ("preflight", preflight_response()),
        Dispatch::Static => ("static", state.static_files.serve(request).await),
        Dispatch::Proxy => {
            let path_and_query = request
                .uri()
                .path_and_query()
                .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());
            let origin = state.routes.select(&path_and_query);
            let target = origin.role().as_str();
            (target, state.forwarder.forward(request, origin).await)
        }
        Dispatch::MethodNotAllowed => ("none", method_not_allowed(&method)),
        Dispatch::NotFound => ("none", not_found()),
    };

    let status = response.status();
    logging::log_access(&request_id, &method, &path, status, target, start_time.elapsed());
    metrics::record_request(method.as_str(), status.as_u16(), target, start_time);

    response
}
