//! Backend selection from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use qpcat_core::paths::ensure_directory;
use qpcat_core::{FileStorage, ResolvedPaths};

use crate::azure::{AzureBlobStorage, AzureConfig, DEFAULT_CONTAINER};
use crate::error::StorageConfigError;
use crate::local::LocalFileStorage;

pub const AZURE_ACCOUNT_NAME_ENV: &str = "AZURE_ACCOUNT_NAME";
pub const AZURE_ACCOUNT_KEY_ENV: &str = "AZURE_ACCOUNT_KEY";
pub const AZURE_CONTAINER_ENV: &str = "AZURE_CONTAINER";

/// Which backend to build. Decided once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local { root: PathBuf },
    AzureBlob(AzureConfig),
}

impl StorageConfig {
    pub fn from_env(paths: &ResolvedPaths) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), paths)
    }

    /// Azure is used only when account, key and container are all non-empty;
    /// otherwise files go under `paths.media_root`.
    pub fn from_lookup<F>(lookup: F, paths: &ResolvedPaths) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let account = value(AZURE_ACCOUNT_NAME_ENV);
        let key = value(AZURE_ACCOUNT_KEY_ENV);
        let container = lookup(AZURE_CONTAINER_ENV)
            .map_or_else(|| DEFAULT_CONTAINER.to_string(), |v| v.trim().to_string());

        if !account.is_empty() && !key.is_empty() && !container.is_empty() {
            return Self::AzureBlob(AzureConfig {
                account,
                key,
                container,
            });
        }

        if !account.is_empty() || !key.is_empty() {
            info!(
                account_set = !account.is_empty(),
                key_set = !key.is_empty(),
                container = %container,
                "Azure storage settings incomplete, using local storage"
            );
        }
        Self::Local {
            root: paths.media_root.clone(),
        }
    }

    /// Build the configured backend, creating the local root if needed.
    pub fn build(&self) -> Result<Arc<dyn FileStorage>, StorageConfigError> {
        match self {
            Self::Local { root } => {
                ensure_directory(root)?;
                info!(root = %root.display(), "Using local file storage");
                Ok(Arc::new(LocalFileStorage::new(root.clone())))
            }
            Self::AzureBlob(config) => {
                let storage = AzureBlobStorage::new(config)?;
                info!(
                    account = %config.account,
                    container = %storage.container(),
                    "Using Azure Blob storage"
                );
                Ok(Arc::new(storage))
            }
        }
    }
}
