//! Backend selection.
//!
//! # Responsibilities
//! - Store the ordered prefix routes
//! - Select the backend origin for a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan in declared order (tables are tiny)
//! - First match wins; no match means the primary backend, never an error

use crate::config::schema::{BackendRole, BackendsConfig, RouteConfig};
use crate::config::validation::ValidationError;
use crate::routing::backend::BackendOrigin;
use crate::routing::matcher::{strip_query, Matcher, PathPrefixMatcher};

/// One prefix route.
#[derive(Debug, Clone)]
pub struct Route {
    pub matcher: PathPrefixMatcher,
    pub backend: BackendRole,
}

/// Ordered route table plus the two backend origins it selects between.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    primary: BackendOrigin,
    decision: BackendOrigin,
}

impl RouteTable {
    /// Create a table from already-validated origins.
    pub fn new(primary: BackendOrigin, decision: BackendOrigin, routes: Vec<Route>) -> Self {
        Self {
            routes,
            primary,
            decision,
        }
    }

    /// Compile the table from configuration.
    pub fn from_config(
        backends: &BackendsConfig,
        routes: &[RouteConfig],
    ) -> Result<Self, ValidationError> {
        let primary = BackendOrigin::parse(BackendRole::Primary, &backends.primary)?;
        let decision = BackendOrigin::parse(BackendRole::Decision, &backends.decision)?;
        let routes = routes
            .iter()
            .map(|r| Route {
                matcher: PathPrefixMatcher::new(r.path_prefix.clone()),
                backend: r.backend,
            })
            .collect();
        Ok(Self::new(primary, decision, routes))
    }

    /// Pick the backend for an inbound path. The query string is ignored.
    pub fn select(&self, path_and_query: &str) -> &BackendOrigin {
        let path = strip_query(path_and_query);
        let role = self
            .routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map_or(BackendRole::Primary, |route| route.backend);
        self.origin(role)
    }

    /// The origin configured for a role.
    pub fn origin(&self, role: BackendRole) -> &BackendOrigin {
        match role {
            BackendRole::Primary => &self.primary,
            BackendRole::Decision => &self.decision,
        }
    }

    /// Routes in evaluation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
