//! Bulk upload service - validate an uploaded archive, then ingest it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Month, ResolvedSubject};
use crate::ingest::{ArchiveValidator, BulkIngestor, IngestionOutcome};
use crate::ports::{CatalogRepository, CoreError, FileStorage, QuestionPaperRepository, RepositoryError};

/// Form data of one bulk upload.
#[derive(Debug, Clone)]
pub struct BulkUploadRequest {
    pub subject_id: i64,
    pub year: i32,
    pub month: Month,
    /// Client-supplied name of the uploaded file.
    pub filename: String,
    pub archive: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One flash-style message shown after the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn success(text: String) -> Self {
        Self {
            level: NoticeLevel::Success,
            text,
        }
    }

    fn error(text: String) -> Self {
        Self {
            level: NoticeLevel::Error,
            text,
        }
    }
}

/// Result of a completed upload, partial failures included.
#[derive(Debug, Clone, Serialize)]
pub struct BulkUploadReport {
    pub subject: ResolvedSubject,
    pub outcome: IngestionOutcome,
    pub notices: Vec<Notice>,
    /// Page path of the destination subject.
    pub redirect: String,
}

impl BulkUploadReport {
    fn new(subject: ResolvedSubject, outcome: IngestionOutcome) -> Self {
        let mut notices = Vec::new();
        if outcome.success_count > 0 {
            notices.push(Notice::success(format!(
                "Successfully uploaded {} question papers to {}",
                outcome.success_count, subject.subject.name
            )));
        }
        if outcome.failure_count > 0 {
            notices.push(Notice::error(format!(
                "Failed to upload {} files. See details below.",
                outcome.failure_count
            )));
            notices.extend(outcome.messages.iter().cloned().map(Notice::error));
        }
        let redirect = subject.path.url_path();
        Self {
            subject,
            outcome,
            notices,
            redirect,
        }
    }
}

pub struct BulkUploadService {
    catalog: Arc<dyn CatalogRepository>,
    ingestor: BulkIngestor,
}

impl BulkUploadService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        papers: Arc<dyn QuestionPaperRepository>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            catalog,
            ingestor: BulkIngestor::new(papers, storage),
        }
    }

    /// Validate the form, then ingest every PDF in the archive.
    ///
    /// Validation failures (unknown subject, rejected archive) create
    /// nothing. Once validation passes the call completes with a report,
    /// unless the archive cannot be reopened for ingestion.
    pub async fn upload(&self, request: &BulkUploadRequest) -> Result<BulkUploadReport, CoreError> {
        let subject = match self.catalog.resolve_subject(request.subject_id).await {
            Ok(subject) => subject,
            Err(RepositoryError::NotFound(_)) => {
                return Err(CoreError::Validation(format!(
                    "Select a valid subject. {} is not one of the available choices.",
                    request.subject_id
                )));
            }
            Err(e) => return Err(e.into()),
        };
        let entries = ArchiveValidator::validate(&request.archive, &request.filename)?;

        info!(
            target: "qpcat.ingest",
            filename = %request.filename,
            bytes = request.archive.len(),
            path = %subject.path.storage_dir(),
            "Accepted bulk upload"
        );

        let outcome = self
            .ingestor
            .ingest(&request.archive, &entries, &subject, request.year, request.month)
            .await?;
        Ok(BulkUploadReport::new(subject, outcome))
    }
}
