//! Response handling and transformation.
//!
//! # Responsibilities
//! - Inject the CORS header set on every API and preflight response
//! - Build the `{"success": false, "error": ...}` envelope for local failures
//! - Answer preflight requests without touching a backend
//!
//! # Design Decisions
//! - CORS is unconditional: wildcard origin, no allowlist, no credential mode
//! - CORS headers are always ours; a backend's CORS headers are never relayed
//! - Static responses carry no CORS headers

use axum::{
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::routing::dispatch::FORWARDED_METHODS;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE: &str = "86400";

/// Insert the CORS header set, replacing any existing values.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
}

/// Add CORS headers to an already-built response.
pub fn with_cors(mut response: Response) -> Response {
    apply_cors_headers(response.headers_mut());
    response
}

/// 204 with CORS headers and no body.
pub fn preflight_response() -> Response {
    with_cors(StatusCode::NO_CONTENT.into_response())
}

/// Body of every synthesized error.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub success: bool,
    pub error: &'a str,
}

/// JSON error envelope with CORS headers.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let envelope = ErrorEnvelope {
        success: false,
        error: message,
    };
    with_cors((status, Json(envelope)).into_response())
}

/// 405 for an API path hit with a method that is never forwarded.
pub fn method_not_allowed(method: &Method) -> Response {
    let mut response = json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method {} is not supported on API paths", method),
    );
    let allow = FORWARDED_METHODS
        .iter()
        .map(Method::as_str)
        .chain(std::iter::once(Method::OPTIONS.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

/// Plain 404 for non-API paths that are neither static reads nor preflights.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
