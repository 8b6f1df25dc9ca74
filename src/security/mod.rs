//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request selected for forwarding:
//!     → limits.rs (size-guarded body read)
//!     → headers.rs (allowlist the outbound header subset)
//!     → Pass to the forwarder
//! ```
//!
//! # Design Decisions
//! - Fail closed: oversize bodies are rejected, never truncated
//! - No trust in client input: only two inbound headers ever reach a backend

pub mod headers;
pub mod limits;
