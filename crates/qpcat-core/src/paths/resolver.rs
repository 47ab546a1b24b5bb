//! Environment-driven path resolution.
//!
//! Resolution order for each location is: explicit environment override,
//! then a default derived from the data root. The data root itself defaults
//! to `{system data dir}/qpcat`.

use std::fmt;
use std::path::PathBuf;

use super::error::PathError;

/// Overrides the data root.
pub const DATA_DIR_ENV: &str = "QPCAT_DATA_DIR";
/// Overrides the `SQLite` database file.
pub const DATABASE_PATH_ENV: &str = "QPCAT_DATABASE_PATH";
/// Overrides the local storage root for question paper files.
pub const MEDIA_ROOT_ENV: &str = "QPCAT_MEDIA_ROOT";

const APP_DIR: &str = "qpcat";
const DATABASE_FILE: &str = "qpcat.db";

/// All resolved locations captured in a single struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data.
    pub data_root: PathBuf,
    /// Path to the `SQLite` database file.
    pub database_path: PathBuf,
    /// Root under which the local backend stores question paper files.
    pub media_root: PathBuf,
}

impl ResolvedPaths {
    /// Resolve using the process environment and the platform data directory.
    pub fn resolve() -> Result<Self, PathError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::data_dir())
    }

    /// Resolve from an arbitrary variable lookup.
    ///
    /// `system_data_dir` is only consulted when no data root override is set.
    pub fn from_lookup<F>(lookup: F, system_data_dir: Option<PathBuf>) -> Result<Self, PathError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_root = match override_path(&lookup, DATA_DIR_ENV)? {
            Some(path) => path,
            None => system_data_dir.ok_or(PathError::NoDataDir)?.join(APP_DIR),
        };
        let database_path = override_path(&lookup, DATABASE_PATH_ENV)?
            .unwrap_or_else(|| data_root.join("data").join(DATABASE_FILE));
        let media_root = override_path(&lookup, MEDIA_ROOT_ENV)?
            .unwrap_or_else(|| data_root.join("media").join("question_papers"));

        Ok(Self {
            data_root,
            database_path,
            media_root,
        })
    }
}

fn override_path<F>(lookup: &F, key: &'static str) -> Result<Option<PathBuf>, PathError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Err(PathError::EmptyOverride(key)),
        Some(raw) => Ok(Some(PathBuf::from(raw.trim()))),
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "database_path = {}", self.database_path.display())?;
        write!(f, "media_root = {}", self.media_root.display())
    }
}
