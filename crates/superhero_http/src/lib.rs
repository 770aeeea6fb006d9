//! HTTP adapter for the superhero Record Store.
//!
//! # Responsibility
//! - Expose each Record Store operation as one JSON endpoint.
//! - Parse multipart uploads into core input values.
//!
//! # Invariants
//! - Handlers never touch SQL or the file system directly.
//! - Blocking store work runs on the blocking thread pool.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::HttpServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use routes::superhero_routes;
pub use state::AppState;
