//! Serve command handler.

use qpcat_axum::{ServerConfig, start_server};

use crate::error::CliError;

/// Run the HTTP API until the process is stopped.
///
/// The server bootstraps its own context, so no `CliContext` is needed.
pub async fn execute(port: u16) -> Result<(), CliError> {
    let config = ServerConfig::default().with_port(port);
    start_server(config)
        .await
        .map_err(|e| CliError::Core(format!("{e:#}")))
}
