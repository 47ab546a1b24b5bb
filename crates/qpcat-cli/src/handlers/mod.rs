//! Command handlers that delegate to `AppCore`.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Thin wrappers that parse CLI input, call `AppCore` and format output
//!
//! Rendering is split from printing so output can be asserted in tests.

pub mod admin;
pub mod ingest;
pub mod paths;
pub mod search;
pub mod serve;
pub mod tree;
