//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the development proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// The two backend origins requests can be forwarded to.
    pub backends: BackendsConfig,

    /// Ordered prefix routes. First match wins; no match goes to the primary backend.
    pub routes: Vec<RouteConfig>,

    /// Which paths count as API traffic.
    pub dispatch: DispatchConfig,

    /// Static asset tree.
    pub static_files: StaticFilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backends: BackendsConfig::default(),
            routes: vec![RouteConfig {
                path_prefix: "/api/v1/pods/pids".to_string(),
                backend: BackendRole::Decision,
            }],
            dispatch: DispatchConfig::default(),
            static_files: StaticFilesConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// The role a backend plays. There are exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendRole {
    /// General API traffic.
    Primary,
    /// The decision backend, reached only through explicit routes.
    Decision,
}

impl BackendRole {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendRole::Primary => "primary",
            BackendRole::Decision => "decision",
        }
    }
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend origin URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Primary API origin (e.g., "http://localhost:8080").
    pub primary: String,

    /// Decision backend origin (e.g., "http://localhost:8081").
    pub decision: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            primary: "http://localhost:8080".to_string(),
            decision: "http://localhost:8081".to_string(),
        }
    }
}

impl BackendsConfig {
    /// Raw origin string configured for a role.
    pub fn origin(&self, role: BackendRole) -> &str {
        match role {
            BackendRole::Primary => &self.primary,
            BackendRole::Decision => &self.decision,
        }
    }
}

/// Route configuration mapping a path prefix to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path prefix to match (case-sensitive, no wildcards).
    pub path_prefix: String,

    /// Backend that serves matching paths.
    pub backend: BackendRole,
}

/// API dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Path prefixes that are proxied rather than served from disk.
    pub api_prefixes: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            api_prefixes: vec![
                "/api/".to_string(),
                "/health".to_string(),
                "/version".to_string(),
            ],
        }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served for non-API GET requests.
    pub root: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a single backend exchange (connect, head and body) in seconds.
    pub backend_secs: u64,

    /// Cap on a whole inbound exchange in seconds. Must be greater than `backend_secs`.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            backend_secs: 30,
            request_secs: 60,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body forwarded to a backend, in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_layout() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.backends.primary, "http://localhost:8080");
        assert_eq!(config.backends.decision, "http://localhost:8081");
        assert_eq!(
            config.routes,
            vec![RouteConfig {
                path_prefix: "/api/v1/pods/pids".into(),
                backend: BackendRole::Decision,
            }]
        );
        assert_eq!(config.timeouts.backend_secs, 30);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            port = 4000

            [[routes]]
            path_prefix = "/api/v1/intents"
            backend = "decision"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.listener.bind_address, "0.0.0.0");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].path_prefix, "/api/v1/intents");
        assert_eq!(config.dispatch.api_prefixes.len(), 3);
    }
}
