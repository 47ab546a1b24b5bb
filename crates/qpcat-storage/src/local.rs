//! Local filesystem backend.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use qpcat_core::{FileRef, FileStorage, StorageError, StoragePath};

use crate::naming;

/// Stores files below a root directory, one file per key.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// The root must already exist; see [`crate::StorageConfig::build`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto the filesystem, refusing anything that escapes the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        if key.is_empty() || key.contains('\\') {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Create the file only if nothing is there yet.
    async fn create_new(path: &Path, bytes: &[u8]) -> Result<bool, StorageError> {
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(io_error(path, &e)),
        };

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial file");
            }
            return Err(io_error(path, &e));
        }
        Ok(true)
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn write(&self, path: &StoragePath, bytes: &[u8]) -> Result<FileRef, StorageError> {
        let dir = self.resolve(path.dir())?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, &e))?;

        for filename in naming::candidates(path.filename()) {
            let target = path.with_filename(filename);
            let key = target.key();
            let full = self.resolve(&key)?;
            if Self::create_new(&full, bytes).await? {
                debug!(key = %key, bytes = bytes.len(), "Stored file");
                return Ok(FileRef::new(key));
            }
            debug!(key = %key, "Key taken, trying another name");
        }
        Err(StorageError::Io(format!(
            "no free name for {path} after {} attempts",
            naming::MAX_NAME_ATTEMPTS
        )))
    }

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(file.as_str())?;
        fs::read(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(file.to_string()),
            _ => io_error(&full, &e),
        })
    }

    async fn delete(&self, file: &FileRef) -> Result<(), StorageError> {
        let full = self.resolve(file.as_str())?;
        fs::remove_file(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(file.to_string()),
            _ => io_error(&full, &e),
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
