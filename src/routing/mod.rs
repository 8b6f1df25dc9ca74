//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → dispatch.rs (preflight / proxy / static / reject)
//!     → router.rs (proxy only: pick backend origin)
//!     → matcher.rs (evaluate prefix conditions)
//!     → backend.rs (origin + path_and_query)
//!
//! Route Compilation (at startup):
//!     BackendsConfig + RouteConfig[]
//!     → validate origins
//!     → compile prefix matchers in declared order
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declared order)

pub mod backend;
pub mod dispatch;
pub mod matcher;
pub mod router;

pub use backend::BackendOrigin;
pub use dispatch::{Dispatch, Dispatcher};
pub use router::RouteTable;
