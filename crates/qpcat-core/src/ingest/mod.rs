//! Bulk ZIP ingestion pipeline.
//!
//! # Structure
//!
//! - `archive` - upload-time validation, lists the PDF entries
//! - `ingestor` - stores each entry and creates its record
//! - `naming` - entry name → title → stored filename
//! - `outcome` - aggregate success/failure report

mod archive;
mod ingestor;
mod naming;
mod outcome;

pub use archive::{ARCHIVE_EXTENSION, ArchiveError, ArchiveValidator, PDF_SUFFIX, is_qualifying_entry};
pub use ingestor::{BulkIngestor, IngestError, MAX_ENTRY_BYTES};
pub use naming::{STORED_EXTENSION, canonical_filename, derive_title, entry_base_name};
pub use outcome::IngestionOutcome;
