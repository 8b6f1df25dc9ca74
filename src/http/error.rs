//! Local failure taxonomy for the forwarder.
//!
//! A backend that answers with 4xx/5xx is not an error here; its response is
//! relayed as-is. These variants cover only what this process synthesizes.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::json_error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection refused, DNS failure, reset, or a broken response body.
    #[error("API server unreachable: {0}")]
    Unreachable(String),

    /// No complete backend response within the deadline.
    #[error("API server unreachable: timed out after {0}s")]
    Timeout(u64),

    /// Inbound body larger than the configured cap.
    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// Anything else that went wrong locally.
    #[error("Proxy error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Unreachable(_) | ProxyError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Unreachable(_) => "unreachable",
            ProxyError::Timeout(_) => "timeout",
            ProxyError::PayloadTooLarge { .. } => "payload_too_large",
            ProxyError::Internal(_) => "internal",
        }
    }

    /// Unreachable, with the full source chain as the cause.
    pub fn unreachable(err: &(dyn StdError + 'static)) -> Self {
        ProxyError::Unreachable(error_chain(err))
    }

    /// Internal, with the full source chain as the cause.
    pub fn internal(err: &(dyn StdError + 'static)) -> Self {
        ProxyError::Internal(error_chain(err))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        json_error(self.status(), &self.to_string())
    }
}

/// Render an error and its sources as `outer: inner: root`.
///
/// hyper's client errors are terse at the top ("client error (Connect)"); the
/// useful detail ("Connection refused") sits further down the chain.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
