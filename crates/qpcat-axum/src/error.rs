//! Axum-specific error types and mappings.
//!
//! Maps `CoreError` and its parts to HTTP status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qpcat_core::{ArchiveError, CoreError, IngestError, RepositoryError, StorageError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The uploaded file was rejected before ingestion.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Conflict (resource already exists).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    /// Stable error type discriminant for client-side handling
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    error_type: Option<&'static str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, error_type) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Self::InvalidArchive(msg) => (StatusCode::BAD_REQUEST, msg, Some("INVALID_ARCHIVE")),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            Self::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
            error_type,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Storage(storage_err) => storage_err.into(),
            CoreError::Archive(archive_err) => archive_err.into(),
            CoreError::Ingest(ingest_err) => ingest_err.into(),
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => Self::Conflict(msg),
            RepositoryError::Storage(msg) => Self::Internal(format!("Storage: {msg}")),
            RepositoryError::Serialization(msg) => Self::Internal(format!("Serialization: {msg}")),
            RepositoryError::Constraint(msg) => Self::BadRequest(msg),
        }
    }
}

impl From<StorageError> for HttpError {
    /// A record whose bytes cannot be read is a server fault, even when the
    /// backend reports the file missing.
    fn from(err: StorageError) -> Self {
        Self::Internal(format!("File storage: {err}"))
    }
}

impl From<ArchiveError> for HttpError {
    fn from(err: ArchiveError) -> Self {
        Self::InvalidArchive(err.to_string())
    }
}

impl From<IngestError> for HttpError {
    fn from(err: IngestError) -> Self {
        Self::Internal(err.to_string())
    }
}
