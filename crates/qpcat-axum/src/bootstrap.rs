//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the HTTP adapter. All concrete implementations are instantiated here.

use std::sync::Arc;

use anyhow::Result;
use qpcat_core::services::AppCore;
use qpcat_core::ResolvedPaths;
use qpcat_db::{CoreFactory, setup_database};
use qpcat_storage::StorageConfig;
use tracing::info;

/// Port used when neither `--port` nor `QPCAT_PORT` is given.
pub const DEFAULT_PORT: u16 = 8000;

/// Largest accepted request body. Bulk uploads carry whole archives.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Body limit for uploads.
    pub max_upload_bytes: usize,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The core application facade.
    pub core: Arc<AppCore>,
    /// Body limit applied to the upload route.
    pub max_upload_bytes: usize,
}

impl AxumContext {
    pub fn new(core: Arc<AppCore>) -> Self {
        Self {
            core,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Resolve paths, open the database and pick the storage backend.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let paths = ResolvedPaths::resolve()?;
    info!(
        target: "qpcat.paths",
        database_path = %paths.database_path.display(),
        data_root = %paths.data_root.display(),
        media_root = %paths.media_root.display(),
        "Axum bootstrap resolved paths"
    );

    let pool = setup_database(&paths.database_path).await?;
    let storage = StorageConfig::from_env(&paths).build()?;
    let core = Arc::new(CoreFactory::build_app_core(pool, storage));
    info!(storage = core.storage_backend(), "Core ready");

    Ok(AxumContext {
        core,
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Bootstrap and serve until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("qpcat API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
