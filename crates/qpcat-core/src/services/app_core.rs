//! `AppCore` - the primary application facade.
//!
//! Adapters (CLI, HTTP) receive an `AppCore` built at their composition root
//! and reach every operation through it.

use std::sync::Arc;

use crate::ports::{FileStorage, Repos};

use super::{BulkUploadService, CatalogService, PaperService};

/// The core application facade.
///
/// # Example
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool);
/// let storage = StorageConfig::from_env(&paths).build()?;
/// let core = AppCore::new(repos, storage);
///
/// let home = core.catalog().departments().await?;
/// ```
pub struct AppCore {
    catalog: CatalogService,
    papers: PaperService,
    bulk_upload: BulkUploadService,
    storage: Arc<dyn FileStorage>,
}

impl AppCore {
    /// Wire services over the given repositories and storage backend.
    pub fn new(repos: Repos, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            catalog: CatalogService::new(repos.catalog.clone(), repos.papers.clone()),
            papers: PaperService::new(repos.papers.clone(), storage.clone()),
            bulk_upload: BulkUploadService::new(repos.catalog, repos.papers, storage.clone()),
            storage,
        }
    }

    /// Catalog administration, browsing, lookups and search.
    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Single-paper lookups and downloads.
    pub const fn papers(&self) -> &PaperService {
        &self.papers
    }

    /// Archive validation and ingestion.
    pub const fn bulk_upload(&self) -> &BulkUploadService {
        &self.bulk_upload
    }

    /// Name of the active storage backend.
    pub fn storage_backend(&self) -> &'static str {
        self.storage.backend_name()
    }
}
