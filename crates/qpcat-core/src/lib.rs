//! Core of the question paper catalog.
//!
//! Domain types, port traits, the bulk ZIP ingestion pipeline and the
//! services adapters call into. No database, filesystem or HTTP code lives
//! here; those are injected through [`ports`].

pub mod domain;
pub mod ingest;
pub mod paths;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use domain::{
    CatalogPath, ChildOption, Department, DepartmentSummary, FileRef, Month, NewDepartment,
    NewQuestionPaper, NewScheme, NewSemester, NewSubject, PaperFilter, PaperHit, PathSegment,
    QuestionPaper, ResolvedSubject, Scheme, Semester, Subject, SubjectSummary, is_valid_slug,
    slugify,
};
pub use ingest::{ArchiveError, ArchiveValidator, BulkIngestor, IngestError, IngestionOutcome};
pub use paths::{PathError, ResolvedPaths};
pub use ports::{
    CatalogRepository, CoreError, FileStorage, QuestionPaperRepository, Repos, RepositoryError,
    StorageError, StoragePath,
};
pub use services::{
    AppCore, BulkUploadReport, BulkUploadRequest, CatalogService, Notice, NoticeLevel,
    PaperDownload, PaperService,
};
