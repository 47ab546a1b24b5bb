//! Composition utilities for building `AppCore` with `SQLite` backends.
//!
//! Construction only; no domain logic lives here.

use sqlx::SqlitePool;
use std::sync::Arc;

use qpcat_core::Repos;
use qpcat_core::ports::FileStorage;
use qpcat_core::services::AppCore;

use crate::repositories::{SqliteCatalogRepository, SqliteQuestionPaperRepository};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Create a `SQLite` connection pool from a URL such as `sqlite:/path/qpcat.db`.
    pub async fn create_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
        let pool = SqlitePool::connect(db_url).await?;
        Ok(pool)
    }

    /// Build all `SQLite` repositories from a pool.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteCatalogRepository::new(pool.clone())),
            Arc::new(SqliteQuestionPaperRepository::new(pool)),
        )
    }

    /// Build a complete `AppCore` from a pool and a storage backend.
    ///
    /// ```ignore
    /// let pool = setup_database(&paths.database_path).await?;
    /// let storage = StorageConfig::from_env(&paths).build()?;
    /// let core = CoreFactory::build_app_core(pool, storage);
    /// ```
    pub fn build_app_core(pool: SqlitePool, storage: Arc<dyn FileStorage>) -> AppCore {
        AppCore::new(Self::build_repos(pool), storage)
    }
}

/// In-memory database with the production schema, for tests in other crates.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }
}
