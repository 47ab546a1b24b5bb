//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - No filesystem or HTTP details in the storage port
//! - Repository traits are minimal; browsing/search composition lives in services

pub mod catalog_repository;
pub mod file_storage;
pub mod question_paper_repository;

use std::sync::Arc;
use thiserror::Error;

pub use catalog_repository::CatalogRepository;
pub use file_storage::{FileStorage, StoragePath};
pub use question_paper_repository::QuestionPaperRepository;

#[cfg(test)]
pub use file_storage::MockFileStorage;

use crate::ingest::{ArchiveError, IngestError};

/// Container for all repository trait objects.
///
/// Lets adapters wire repositories without coupling to concrete
/// implementations. It lives in `qpcat-core` so that `AppCore` can accept
/// it without depending on `qpcat-db`.
#[derive(Clone)]
pub struct Repos {
    /// Department / scheme / semester / subject persistence.
    pub catalog: Arc<dyn CatalogRepository>,
    /// Question paper persistence.
    pub papers: Arc<dyn QuestionPaperRepository>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        papers: Arc<dyn QuestionPaperRepository>,
    ) -> Self {
        Self { catalog, papers }
    }
}

/// Domain-specific errors for repository operations.
///
/// Abstracts away storage implementation details (e.g., sqlx errors) and
/// provides a clean interface for services to handle persistence failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, connection, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value could not be decoded into a domain type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Errors raised by [`FileStorage`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No file exists under the given reference.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The key is not acceptable to the backend (empty, absolute, `..`).
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// Local I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Remote backend answered with an error.
    #[error("Remote storage error: {0}")]
    Remote(String),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// File storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Uploaded archive was rejected before ingestion started.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Ingestion could not run at all.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
