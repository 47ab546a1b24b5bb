//! CLI-specific error types and mappings.
//!
//! Maps `CoreError` and bootstrap failures to exit codes and user-facing
//! messages.

use qpcat_core::{CoreError, PathError, RepositoryError};
use qpcat_storage::StorageConfigError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected input: unknown ids, duplicates, invalid archives.
    #[error("{0}")]
    Invalid(String),

    /// Operation failed after validation passed.
    #[error("{0}")]
    Core(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Invalid(_) | Self::Core(_) => 1,
            Self::Arguments(_) => 2,
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Database(_) => 73, // EX_CANTCREAT (closest fit)
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Validation(msg) => Self::Invalid(msg),
            CoreError::Archive(e) => Self::Invalid(e.to_string()),
            CoreError::Storage(e) => Self::Io(e.to_string()),
            CoreError::Ingest(e) => Self::Core(e.to_string()),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_)
            | RepositoryError::AlreadyExists(_)
            | RepositoryError::Constraint(_) => Self::Invalid(err.to_string()),
            RepositoryError::Storage(_) | RepositoryError::Serialization(_) => {
                Self::Database(err.to_string())
            }
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<StorageConfigError> for CliError {
    fn from(err: StorageConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
