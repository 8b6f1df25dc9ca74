//! Proxy forwarding.
//!
//! # Responsibilities
//! - Turn an inbound API request into one outbound backend request
//! - Relay the backend's status, content type and body (plus `Location` on 3xx)
//! - Synthesize 503/500/413 envelopes for local failures
//!
//! # Design Decisions
//! - Single attempt; the caller owns retry policy
//! - One deadline covers the inbound body read, connect, response head and
//!   response body
//! - Redirects are relayed, not followed; a `Location` on the backend origin is
//!   rewritten to a path on this proxy
//! - Response bodies are buffered so `Content-Length` is exact
//! - The outbound call lives in the handler future: dropping the inbound
//!   connection drops the future and with it the backend request

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::error::ProxyError;
use crate::http::request::RequestIdExt;
use crate::http::response::apply_cors_headers;
use crate::observability::metrics;
use crate::routing::backend::BackendOrigin;
use crate::security::{headers, limits};

/// Content type relayed when the backend sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The outbound half of one forwarded exchange.
#[derive(Debug, Clone)]
pub struct ProxiedRequest {
    pub method: Method,
    /// Inbound path and query, byte-for-byte.
    pub path_and_query: String,
    /// Allowlisted inbound headers only.
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ProxiedRequest {
    /// Extract the forwardable parts of an inbound request.
    pub async fn from_inbound(request: Request<Body>, max_body_size: usize) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();

        let body = if limits::carries_body(&parts.method) {
            limits::read_declared_body(&parts.headers, body, max_body_size).await?
        } else {
            None
        };

        Ok(Self {
            method: parts.method,
            path_and_query,
            headers: headers::forwardable(&parts.headers),
            body,
        })
    }

    /// Build the request sent to `origin`.
    pub fn into_outbound(self, origin: &BackendOrigin) -> Result<Request<Body>, ProxyError> {
        let uri: Uri = origin
            .join(&self.path_and_query)
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| ProxyError::internal(&e))?;

        let mut builder = Request::builder().method(self.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }

        let body = self.body.map_or_else(Body::empty, Body::from);
        builder.body(body).map_err(|e| ProxyError::internal(&e))
    }
}

/// What is relayed back from a backend.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    /// Redirect target, kept on 3xx only.
    pub location: Option<HeaderValue>,
    pub body: Bytes,
}

impl ProxiedResponse {
    /// Keep status, content type (defaulted), body and, on 3xx, `Location`.
    /// Every other backend header is dropped.
    pub fn from_backend(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let location = if status.is_redirection() {
            headers.get(header::LOCATION).cloned()
        } else {
            None
        };
        Self {
            status,
            content_type,
            location,
            body,
        }
    }

    /// Rewrite an absolute `Location` on `origin` to a path on this proxy,
    /// so the browser follows the redirect back through us.
    pub fn rebased_on(mut self, origin: &BackendOrigin) -> Self {
        self.location = self.location.map(|location| rebase_location(location, origin));
        self
    }
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        let length = self.body.len();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        apply_cors_headers(headers);
        headers.insert(header::CONTENT_TYPE, self.content_type);
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        if let Some(location) = self.location {
            headers.insert(header::LOCATION, location);
        }
        response
    }
}

fn rebase_location(location: HeaderValue, origin: &BackendOrigin) -> HeaderValue {
    let rebased = location
        .to_str()
        .ok()
        .and_then(|raw| raw.strip_prefix(origin.as_str()))
        .and_then(|rest| match rest {
            "" => Some("/".to_string()),
            _ if rest.starts_with('/') => Some(rest.to_string()),
            _ if rest.starts_with('?') => Some(format!("/{rest}")),
            _ => None,
        })
        .and_then(|path| HeaderValue::from_str(&path).ok());
    rebased.unwrap_or(location)
}

/// Logs when a backend call is abandoned because its handler was dropped.
struct InFlight<'a> {
    request_id: &'a str,
    backend: &'a BackendOrigin,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(request_id: &'a str, backend: &'a BackendOrigin) -> Self {
        Self {
            request_id,
            backend,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                request_id = %self.request_id,
                backend = %self.backend,
                "Client went away, backend call abandoned"
            );
        }
    }
}

/// Forwards API requests to a backend origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_body_size: usize,
}

impl Forwarder {
    pub fn new(timeout: Duration, max_body_size: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            timeout,
            max_body_size,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward `request` to `origin` and produce the response for the caller.
    ///
    /// Never fails: local problems become JSON envelopes, all with CORS headers.
    pub async fn forward(&self, request: Request<Body>, origin: &BackendOrigin) -> Response {
        let request_id = request.request_id().to_string();
        let method = request.method().clone();

        match self.try_forward(request, origin, &request_id).await {
            Ok(relayed) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    backend = %origin,
                    status = %relayed.status,
                    bytes = relayed.body.len(),
                    "Relayed backend response"
                );
                relayed.into_response()
            }
            Err(err) => {
                match &err {
                    ProxyError::Internal(_) => {
                        tracing::error!(request_id = %request_id, backend = %origin, error = %err, "Proxy failure")
                    }
                    _ => {
                        tracing::warn!(request_id = %request_id, backend = %origin, error = %err, "Backend request failed")
                    }
                }
                metrics::record_backend_failure(origin.role().as_str(), err.kind());
                err.into_response()
            }
        }
    }

    async fn try_forward(
        &self,
        request: Request<Body>,
        origin: &BackendOrigin,
        request_id: &str,
    ) -> Result<ProxiedResponse, ProxyError> {
        let in_flight = InFlight::start(request_id, origin);
        let result = tokio::time::timeout(self.timeout, self.relay(request, origin, request_id)).await;
        in_flight.finish();

        match result {
            Ok(relayed) => relayed,
            Err(_) => Err(ProxyError::Timeout(self.timeout.as_secs())),
        }
    }

    /// Inbound body read, outbound call and response body, all under one deadline.
    async fn relay(
        &self,
        request: Request<Body>,
        origin: &BackendOrigin,
        request_id: &str,
    ) -> Result<ProxiedResponse, ProxyError> {
        let proxied = ProxiedRequest::from_inbound(request, self.max_body_size).await?;

        tracing::debug!(
            request_id = %request_id,
            method = %proxied.method,
            url = %origin.join(&proxied.path_and_query),
            body_bytes = proxied.body.as_ref().map_or(0, Bytes::len),
            "Forwarding request"
        );

        let outbound = proxied.into_outbound(origin)?;
        self.exchange(outbound, origin).await
    }

    async fn exchange(
        &self,
        outbound: Request<Body>,
        origin: &BackendOrigin,
    ) -> Result<ProxiedResponse, ProxyError> {
        let response = self
            .client
            .request(outbound)
            .await
            .map_err(|e| ProxyError::unreachable(&e))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| ProxyError::unreachable(&e))?
            .to_bytes();

        Ok(ProxiedResponse::from_backend(parts.status, &parts.headers, body).rebased_on(origin))
    }
}
