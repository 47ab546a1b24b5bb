//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports and domain logic. They never know
//! which database or storage backend sits behind the ports.

mod app_core;
mod bulk_upload;
mod catalog_service;
mod paper_service;

pub use app_core::AppCore;
pub use bulk_upload::{
    BulkUploadReport, BulkUploadRequest, BulkUploadService, Notice, NoticeLevel,
};
pub use catalog_service::{
    CatalogService, DashboardStats, DepartmentBranch, DepartmentPage, RECENT_PAPERS_LIMIT,
    SchemeBranch, SchemePage, SearchResults, SemesterBranch, SemesterPage, SubjectPage,
};
pub use paper_service::{PDF_CONTENT_TYPE, PaperDownload, PaperService};
