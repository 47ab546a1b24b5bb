//! File storage port.
//!
//! The storage backend (local directory, cloud blob container) is chosen at
//! process start and injected behind this trait. The core never inspects
//! configuration to decide where bytes go.

use std::fmt;

use async_trait::async_trait;

use super::StorageError;
use crate::domain::{CatalogPath, FileRef};

/// Where a file should be written: the subject's directory plus a filename.
///
/// The directory is fully determined by the four catalog slugs, so callers
/// must hand over an already-resolved [`CatalogPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    dir: String,
    filename: String,
}

impl StoragePath {
    /// Target `filename` inside the subject directory of `path`.
    pub fn new(path: &CatalogPath, filename: impl Into<String>) -> Self {
        Self {
            dir: path.storage_dir(),
            filename: filename.into(),
        }
    }

    /// `{department}/{scheme}/{semester}/{subject}`.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Key relative to the storage root.
    pub fn key(&self) -> String {
        format!("{}/{}", self.dir, self.filename)
    }

    /// Same directory, different filename.
    #[must_use]
    pub fn with_filename(&self, filename: impl Into<String>) -> Self {
        Self {
            dir: self.dir.clone(),
            filename: filename.into(),
        }
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dir, self.filename)
    }
}

/// Capability to persist and retrieve file bytes.
///
/// Each call is individually atomic as far as the backend allows; there is
/// no cross-call transaction. When the target key is already taken the
/// backend decides the outcome and reports the key it actually used in the
/// returned [`FileRef`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` at `path`, returning a reference to what was written.
    async fn write(&self, path: &StoragePath, bytes: &[u8]) -> Result<FileRef, StorageError>;

    /// Read back the bytes behind `file`.
    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, StorageError>;

    /// Remove the bytes behind `file`.
    async fn delete(&self, file: &FileRef) -> Result<(), StorageError>;

    /// Short backend name for logs (`local`, `azure-blob`).
    fn backend_name(&self) -> &'static str;
}
