//! Directory creation helpers.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Create `path` (and parents) unless it already exists as a directory.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create the parent directory of a file path, e.g. the database's `data/` dir.
pub fn ensure_parent(file: &Path) -> Result<(), PathError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}
