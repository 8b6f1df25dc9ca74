//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, dispatch)
//!     → OPTIONS: response.rs (204 + CORS)
//!     → static: static_files.rs (ServeDir)
//!     → API: proxy.rs (select backend, forward, relay)
//!         → error.rs (503/500/413 envelopes on local failure)
//!     → Send to client
//! ```

pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use error::ProxyError;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
