//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend origins are usable `http://` URLs
//! - Check prefixes are absolute paths
//! - Validate value ranges (timeouts > 0, body cap > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{BackendRole, ProxyConfig};
use crate::routing::backend::BackendOrigin;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Backend origin is not a usable base URL.
    #[error("backends.{role}: invalid origin '{value}': {reason}")]
    InvalidOrigin {
        role: BackendRole,
        value: String,
        reason: String,
    },

    /// A route or dispatch prefix is not an absolute path.
    #[error("{field}: prefix '{prefix}' must start with '/'")]
    InvalidPrefix { field: &'static str, prefix: String },

    /// No API prefixes configured; nothing would ever be proxied.
    #[error("dispatch.api_prefixes must not be empty")]
    NoApiPrefixes,

    /// A numeric setting that must be positive is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// The outer request cap would fire no later than the backend deadline.
    #[error("timeouts.request_secs ({request_secs}) must be greater than timeouts.backend_secs ({backend_secs})")]
    RequestTimeoutTooShort { request_secs: u64, backend_secs: u64 },

    /// Listener has nothing to bind.
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    for role in [BackendRole::Primary, BackendRole::Decision] {
        if let Err(e) = BackendOrigin::parse(role, config.backends.origin(role)) {
            errors.push(e);
        }
    }

    for route in &config.routes {
        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                field: "routes.path_prefix",
                prefix: route.path_prefix.clone(),
            });
        }
    }

    if config.dispatch.api_prefixes.is_empty() {
        errors.push(ValidationError::NoApiPrefixes);
    }
    for prefix in &config.dispatch.api_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                field: "dispatch.api_prefixes",
                prefix: prefix.clone(),
            });
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.backend_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.backend_secs"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    } else if timeouts.request_secs <= timeouts.backend_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: timeouts.request_secs,
            backend_secs: timeouts.backend_secs,
        });
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero("limits.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
