//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, filesystem, blob storage).
//!
//! # Structure
//!
//! - `catalog` - Department / Scheme / Semester / Subject and catalog paths
//! - `question_paper` - Question papers, months and file references
//! - `slug` - URL slug derivation

mod catalog;
mod question_paper;
mod slug;

pub use catalog::{
    CatalogPath, ChildOption, Department, DepartmentSummary, NewDepartment, NewScheme,
    NewSemester, NewSubject, PathSegment, ResolvedSubject, SEMESTER_NAMES, Scheme, Semester,
    Subject, SubjectSummary, semester_label, semester_name,
};
pub use question_paper::{
    FileRef, Month, NewQuestionPaper, PaperFilter, PaperHit, ParseMonthError, QuestionPaper,
};
pub use slug::{is_valid_slug, slugify};
