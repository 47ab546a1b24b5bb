//! CLI bootstrap - the composition root.
//!
//! Resolves paths, opens the database and picks the storage backend.
//! Command handlers receive the composed `AppCore` through [`CliContext`].

use qpcat_core::ResolvedPaths;
use qpcat_core::services::AppCore;
use qpcat_db::{CoreFactory, setup_database};
use qpcat_storage::StorageConfig;
use tracing::{debug, info};

use crate::error::CliError;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The core application facade.
    pub app: AppCore,
}

impl CliContext {
    pub const fn new(app: AppCore) -> Self {
        Self { app }
    }

    /// Access the `AppCore`.
    pub const fn app(&self) -> &AppCore {
        &self.app
    }
}

/// Build the CLI context from the environment.
pub async fn bootstrap() -> Result<CliContext, CliError> {
    let paths = ResolvedPaths::resolve()?;
    debug!(
        target: "qpcat.paths",
        database_path = %paths.database_path.display(),
        media_root = %paths.media_root.display(),
        "CLI bootstrap resolved paths"
    );

    let pool = setup_database(&paths.database_path)
        .await
        .map_err(|e| CliError::Database(format!("{e:#}")))?;
    let storage = StorageConfig::from_env(&paths).build()?;
    let app = CoreFactory::build_app_core(pool, storage);
    info!(storage = app.storage_backend(), "Catalog opened");

    Ok(CliContext::new(app))
}
