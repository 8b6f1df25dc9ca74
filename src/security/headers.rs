//! Outbound header filtering.
//!
//! # Responsibilities
//! - Decide which inbound headers reach a backend
//!
//! # Design Decisions
//! - Allowlist, not denylist: only `Content-Type` and `Authorization` pass
//! - Hop-by-hop, cookie, forwarding and tracing headers are all dropped
//! - Filtering already-filtered headers is a no-op

use axum::http::{header, HeaderMap, HeaderName};

/// The only inbound headers copied onto an outbound request.
pub const FORWARDED_REQUEST_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::AUTHORIZATION];

/// Copy the forwardable subset of `inbound`.
pub fn forwardable(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(FORWARDED_REQUEST_HEADERS.len());
    for name in FORWARDED_REQUEST_HEADERS {
        for value in inbound.get_all(&name) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}
