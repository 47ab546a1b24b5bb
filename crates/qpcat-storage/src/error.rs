//! Errors raised while building a storage backend.

use qpcat_core::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageConfigError {
    /// `AZURE_ACCOUNT_KEY` is not valid base64.
    #[error("Invalid Azure account key: {0}")]
    InvalidAccountKey(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    /// Local media root could not be prepared.
    #[error(transparent)]
    Path(#[from] PathError),
}
