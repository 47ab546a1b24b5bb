//! Catalog repository trait definition.
//!
//! This port defines persistence for the Department → Scheme → Semester →
//! Subject hierarchy. Implementations handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{
    Department, DepartmentSummary, NewDepartment, NewScheme, NewSemester, NewSubject,
    ResolvedSubject, Scheme, Semester, Subject, SubjectSummary,
};

/// Repository for the catalog hierarchy.
///
/// `insert_*` methods store the `effective_slug()` of the new node and return
/// `Err(RepositoryError::AlreadyExists)` when a sibling already uses the same
/// name/number or slug. `get_*` methods return `Err(RepositoryError::NotFound)`
/// for unknown ids or slugs.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Departments

    async fn insert_department(&self, new: &NewDepartment) -> Result<Department, RepositoryError>;

    /// All departments ordered by name, with the number of subjects beneath each.
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, RepositoryError>;

    async fn get_department(&self, id: i64) -> Result<Department, RepositoryError>;

    async fn get_department_by_slug(&self, slug: &str) -> Result<Department, RepositoryError>;

    // Schemes

    async fn insert_scheme(&self, new: &NewScheme) -> Result<Scheme, RepositoryError>;

    /// Schemes of a department, newest year first.
    async fn list_schemes(&self, department_id: i64) -> Result<Vec<Scheme>, RepositoryError>;

    async fn get_scheme(&self, id: i64) -> Result<Scheme, RepositoryError>;

    async fn get_scheme_by_slug(
        &self,
        department_id: i64,
        slug: &str,
    ) -> Result<Scheme, RepositoryError>;

    // Semesters

    async fn insert_semester(&self, new: &NewSemester) -> Result<Semester, RepositoryError>;

    /// Semesters of a scheme, by number.
    async fn list_semesters(&self, scheme_id: i64) -> Result<Vec<Semester>, RepositoryError>;

    async fn get_semester(&self, id: i64) -> Result<Semester, RepositoryError>;

    async fn get_semester_by_slug(
        &self,
        scheme_id: i64,
        slug: &str,
    ) -> Result<Semester, RepositoryError>;

    // Subjects

    async fn insert_subject(&self, new: &NewSubject) -> Result<Subject, RepositoryError>;

    /// Subjects of a semester ordered by name, with their paper counts.
    async fn list_subjects(&self, semester_id: i64)
    -> Result<Vec<SubjectSummary>, RepositoryError>;

    async fn get_subject(&self, id: i64) -> Result<Subject, RepositoryError>;

    async fn get_subject_by_slug(
        &self,
        semester_id: i64,
        slug: &str,
    ) -> Result<Subject, RepositoryError>;

    /// Load a subject together with its full ancestry in one lookup.
    async fn resolve_subject(&self, subject_id: i64) -> Result<ResolvedSubject, RepositoryError>;

    // Search and statistics

    /// Subjects whose name, code or description contains `query` (case-insensitive).
    async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, RepositoryError>;

    /// Departments whose name or description contains `query` (case-insensitive).
    async fn search_departments(&self, query: &str) -> Result<Vec<Department>, RepositoryError>;

    async fn count_departments(&self) -> Result<i64, RepositoryError>;

    async fn count_subjects(&self) -> Result<i64, RepositoryError>;
}
