//! Per-entry ingestion of a validated archive.

use std::io::{Cursor, Read};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use super::naming::{canonical_filename, derive_title};
use super::outcome::IngestionOutcome;
use crate::domain::{Month, NewQuestionPaper, QuestionPaper, ResolvedSubject};
use crate::ports::{
    FileStorage, QuestionPaperRepository, RepositoryError, StorageError, StoragePath,
};

/// Failure of a whole ingestion call.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The archive passed validation but could not be opened for reading.
    #[error("Archive could not be opened for ingestion: {0}")]
    ArchiveUnreadable(String),
}

/// Failure of a single entry. Recorded in the outcome, never propagated.
#[derive(Debug, Error)]
enum EntryError {
    #[error("{0}")]
    Extract(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Persist(#[from] RepositoryError),
}

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Largest decompressed size accepted for a single entry.
pub const MAX_ENTRY_BYTES: u64 = 512 * 1024 * 1024;

/// Turns each qualifying archive entry into a stored file plus a record.
///
/// Entries are handled one at a time in the order given. A failing entry
/// is counted and described in the outcome; the rest of the batch carries on.
pub struct BulkIngestor {
    papers: Arc<dyn QuestionPaperRepository>,
    storage: Arc<dyn FileStorage>,
    max_entry_bytes: u64,
}

impl BulkIngestor {
    pub fn new(papers: Arc<dyn QuestionPaperRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            papers,
            storage,
            max_entry_bytes: MAX_ENTRY_BYTES,
        }
    }

    /// Cap the decompressed size of each entry; larger entries fail alone.
    #[must_use]
    pub const fn with_max_entry_bytes(mut self, max_entry_bytes: u64) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Ingest `entries` of `archive` into `subject`.
    ///
    /// # Errors
    ///
    /// Only [`IngestError::ArchiveUnreadable`], when the container itself
    /// cannot be opened. Per-entry problems end up in the outcome.
    pub async fn ingest(
        &self,
        archive: &[u8],
        entries: &[String],
        subject: &ResolvedSubject,
        year: i32,
        month: Month,
    ) -> Result<IngestionOutcome, IngestError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))
            .map_err(|e| IngestError::ArchiveUnreadable(e.to_string()))?;

        info!(
            target: "qpcat.ingest",
            subject_id = subject.subject.id,
            entries = entries.len(),
            year,
            month = month.code(),
            backend = self.storage.backend_name(),
            "Starting bulk ingestion"
        );

        let mut outcome = IngestionOutcome::default();
        for name in entries {
            match self.ingest_entry(&mut zip, name, subject, year, month).await {
                Ok(paper) => {
                    debug!(
                        target: "qpcat.ingest",
                        entry = %name,
                        paper_id = paper.id,
                        file = %paper.file,
                        "Ingested entry"
                    );
                    outcome.record_success(paper.id);
                }
                Err(e) => {
                    warn!(target: "qpcat.ingest", entry = %name, error = %e, "Entry failed");
                    outcome.record_failure(name, &e);
                }
            }
        }

        info!(
            target: "qpcat.ingest",
            subject_id = subject.subject.id,
            succeeded = outcome.success_count,
            failed = outcome.failure_count,
            "Bulk ingestion finished"
        );
        Ok(outcome)
    }

    async fn ingest_entry(
        &self,
        zip: &mut Archive<'_>,
        name: &str,
        subject: &ResolvedSubject,
        year: i32,
        month: Month,
    ) -> Result<QuestionPaper, EntryError> {
        let bytes = extract_entry(zip, name, self.max_entry_bytes)?;
        let title = derive_title(name);
        let target = StoragePath::new(&subject.path, canonical_filename(&title));
        let file = self.storage.write(&target, &bytes).await?;

        let record = NewQuestionPaper::for_subject(title, &subject.subject, None, year, month, file);
        match self.papers.insert(&record).await {
            Ok(paper) => Ok(paper),
            Err(e) => {
                // Don't leave an orphaned file behind the failed insert.
                if let Err(cleanup) = self.storage.delete(&record.file).await {
                    warn!(
                        target: "qpcat.ingest",
                        file = %record.file,
                        error = %cleanup,
                        "Could not remove stored file after failed insert"
                    );
                }
                Err(e.into())
            }
        }
    }
}

/// Read one entry fully, verifying its checksum.
///
/// Both the declared size and the bytes actually produced are held to
/// `limit`, so a lying header cannot inflate past it either.
fn extract_entry(zip: &mut Archive<'_>, name: &str, limit: u64) -> Result<Vec<u8>, EntryError> {
    let entry = zip
        .by_name(name)
        .map_err(|e| EntryError::Extract(e.to_string()))?;
    let declared = entry.size();
    if declared > limit {
        return Err(too_large(limit));
    }

    let mut bytes = Vec::with_capacity(usize::try_from(declared).unwrap_or_default());
    entry
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| EntryError::Extract(e.to_string()))?;
    if bytes.len() as u64 > limit {
        return Err(too_large(limit));
    }
    Ok(bytes)
}

fn too_large(limit: u64) -> EntryError {
    EntryError::Extract(format!("Entry exceeds the {limit} byte limit"))
}
