//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that delegate to `AppCore`.

pub mod catalog;
pub mod lookup;
pub mod papers;
pub mod search;
pub mod upload;
