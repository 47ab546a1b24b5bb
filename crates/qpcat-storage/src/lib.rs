//! File storage backends for qpcat.
//!
//! Both backends implement [`qpcat_core::FileStorage`] and never overwrite
//! an existing file: a taken key is retried as `{stem}_{suffix}.pdf`.
//! [`StorageConfig`] picks the backend from the environment.

pub mod azure;
mod config;
mod error;
mod local;
mod naming;

pub use azure::{AzureBlobStorage, AzureConfig};
pub use config::{
    AZURE_ACCOUNT_KEY_ENV, AZURE_ACCOUNT_NAME_ENV, AZURE_CONTAINER_ENV, StorageConfig,
};
pub use error::StorageConfigError;
pub use local::LocalFileStorage;
pub use naming::MAX_NAME_ATTEMPTS;
