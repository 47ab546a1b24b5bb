//! JSON HTTP API for the qpcat question paper catalog.
//!
//! Browsing, search, cascading lookups, downloads and bulk ZIP upload,
//! all delegating to `qpcat_core::AppCore`.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, DEFAULT_PORT, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
