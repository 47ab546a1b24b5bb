//! Question paper repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewQuestionPaper, PaperFilter, PaperHit, QuestionPaper};

/// Repository for question paper records.
///
/// Records are insert-only from the core's point of view: ingestion never
/// updates a paper after creating it.
#[async_trait]
pub trait QuestionPaperRepository: Send + Sync {
    /// Insert a paper and return it with its assigned id and timestamps.
    ///
    /// Returns `Err(RepositoryError::Constraint)` if the subject does not exist.
    async fn insert(&self, paper: &NewQuestionPaper) -> Result<QuestionPaper, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<QuestionPaper, RepositoryError>;

    /// Papers of a subject, newest year first, then most recently uploaded.
    async fn list_for_subject(
        &self,
        subject_id: i64,
        filter: &PaperFilter,
    ) -> Result<Vec<QuestionPaper>, RepositoryError>;

    /// Distinct years present for a subject, descending.
    async fn years_for_subject(&self, subject_id: i64) -> Result<Vec<i32>, RepositoryError>;

    /// Papers whose title, subject code, description or subject name contains
    /// `query` (case-insensitive).
    async fn search(&self, query: &str) -> Result<Vec<PaperHit>, RepositoryError>;

    /// Most recently uploaded papers.
    async fn recent(&self, limit: u32) -> Result<Vec<PaperHit>, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}
