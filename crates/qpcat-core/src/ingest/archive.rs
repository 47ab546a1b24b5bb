//! Upload-time inspection of ZIP archives.

use std::io::Cursor;

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

/// Required (case-sensitive) suffix of the uploaded file's name.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Entry-name suffix (case-insensitive) that marks a document for ingestion.
pub const PDF_SUFFIX: &str = ".pdf";

/// Reasons an uploaded archive is rejected before any ingestion happens.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The uploaded file name does not end in `.zip`.
    #[error("File must be a ZIP archive.")]
    InvalidFormat { filename: String },

    /// The bytes are not a readable ZIP container.
    #[error("Invalid ZIP file: {0}")]
    CorruptArchive(String),

    /// The archive holds no entry ending in `.pdf`.
    #[error("ZIP file does not contain any PDF files.")]
    NoQualifyingEntries,
}

/// Whether an archive entry name refers to a PDF document.
pub fn is_qualifying_entry(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PDF_SUFFIX)
}

/// Validates uploaded archives and lists the entries worth ingesting.
pub struct ArchiveValidator;

impl ArchiveValidator {
    /// Check `blob` (uploaded as `filename`) and return its PDF entry names.
    ///
    /// Names are returned verbatim, directory prefixes included, in the
    /// archive's own member order. Directory entries and non-PDF members are
    /// skipped without being reported. Nothing is extracted.
    pub fn validate(blob: &[u8], filename: &str) -> Result<Vec<String>, ArchiveError> {
        if !filename.ends_with(ARCHIVE_EXTENSION) {
            return Err(ArchiveError::InvalidFormat {
                filename: filename.to_string(),
            });
        }

        let archive = ZipArchive::new(Cursor::new(blob))
            .map_err(|e| ArchiveError::CorruptArchive(e.to_string()))?;

        let qualifying: Vec<String> = archive
            .file_names()
            .filter(|name| is_qualifying_entry(name))
            .map(str::to_string)
            .collect();

        debug!(
            target: "qpcat.ingest",
            filename,
            total_entries = archive.len(),
            qualifying = qualifying.len(),
            "Validated upload archive"
        );

        if qualifying.is_empty() {
            return Err(ArchiveError::NoQualifyingEntries);
        }
        Ok(qualifying)
    }
}
