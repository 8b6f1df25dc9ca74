//! Backend origin abstraction.
//!
//! # Responsibilities
//! - Represent one of the two configured downstream services
//! - Validate the configured base URL once, at startup
//! - Build outbound URLs by appending the inbound path and query verbatim

use std::fmt;

use url::Url;

use crate::config::schema::BackendRole;
use crate::config::validation::ValidationError;

/// A validated backend base URL tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOrigin {
    role: BackendRole,
    /// Base URL without a trailing slash, exactly as configured otherwise.
    base: String,
}

impl BackendOrigin {
    /// Parse and validate an origin for `role`.
    ///
    /// Only plain `http://` origins are accepted. A base path is allowed; query
    /// strings and fragments are not, since the inbound path is appended verbatim.
    pub fn parse(role: BackendRole, raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidOrigin {
            role,
            value: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid(format!(
                "unsupported scheme '{}', expected http",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }

        Ok(Self {
            role,
            base: raw.trim().trim_end_matches('/').to_string(),
        })
    }

    /// The role this origin plays.
    pub fn role(&self) -> BackendRole {
        self.role
    }

    /// The base URL as configured, minus any trailing slash.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Outbound URL for an inbound path and query, forwarded unmodified.
    pub fn join(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }
}

impl fmt::Display for BackendOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
