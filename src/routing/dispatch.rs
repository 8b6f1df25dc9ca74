//! Inbound request dispatch.
//!
//! Decides, from method and path alone, how a request is handled. The decision
//! is pure so every rule is testable without a socket.

use axum::http::Method;

use crate::routing::matcher::{strip_query, AnyPrefixMatcher, Matcher};

/// Methods forwarded to a backend.
pub const FORWARDED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// How an inbound request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `OPTIONS` on any path: answered locally with 204 and CORS headers.
    Preflight,
    /// API path with a forwarded method: goes to the proxy forwarder.
    Proxy,
    /// Non-API `GET`/`HEAD`: served from the static root.
    Static,
    /// API path with a method outside [`FORWARDED_METHODS`].
    MethodNotAllowed,
    /// Non-API path with a method other than `GET`/`HEAD`.
    NotFound,
}

/// Classifies requests as API or static traffic.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    api: AnyPrefixMatcher,
}

impl Dispatcher {
    pub fn new<I, S>(api_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api: AnyPrefixMatcher::new(api_prefixes),
        }
    }

    /// True if `path` is proxied rather than served from disk.
    pub fn is_api(&self, path: &str) -> bool {
        self.api.matches(strip_query(path))
    }

    pub fn classify(&self, method: &Method, path: &str) -> Dispatch {
        if method == Method::OPTIONS {
            return Dispatch::Preflight;
        }

        if self.is_api(path) {
            if FORWARDED_METHODS.contains(method) {
                Dispatch::Proxy
            } else {
                Dispatch::MethodNotAllowed
            }
        } else if method == Method::GET || method == Method::HEAD {
            Dispatch::Static
        } else {
            Dispatch::NotFound
        }
    }
}
