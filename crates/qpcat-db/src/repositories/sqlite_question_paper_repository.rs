//! `SQLite` implementation of the question paper repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use qpcat_core::domain::{NewQuestionPaper, PaperFilter, PaperHit, QuestionPaper};
use qpcat_core::ports::{QuestionPaperRepository, RepositoryError};

use super::row_mappers::{
    PaperRow, like_pattern, map_sqlx_error, not_found, now, timestamp,
};

const PAPER_COLUMNS: &str = "p.id, p.title, p.subject_id, p.subject_code, p.year, p.month, \
     p.file, p.description, p.upload_date, p.updated_at";

/// Newest year first, then most recent upload.
const PAPER_ORDER: &str = "ORDER BY p.year DESC, p.upload_date DESC, p.id DESC";

pub struct SqliteQuestionPaperRepository {
    pool: SqlitePool,
}

impl SqliteQuestionPaperRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaperHitRow {
    #[sqlx(flatten)]
    paper: PaperRow,
    subject_name: String,
}

impl TryFrom<PaperHitRow> for PaperHit {
    type Error = RepositoryError;

    fn try_from(row: PaperHitRow) -> Result<Self, Self::Error> {
        Ok(Self {
            paper: row.paper.try_into()?,
            subject_name: row.subject_name,
        })
    }
}

#[async_trait]
impl QuestionPaperRepository for SqliteQuestionPaperRepository {
    async fn insert(&self, paper: &NewQuestionPaper) -> Result<QuestionPaper, RepositoryError> {
        let now = now();
        let result = sqlx::query(
            "INSERT INTO question_papers
                (title, subject_id, subject_code, year, month, file, description, upload_date, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&paper.title)
        .bind(paper.subject_id)
        .bind(&paper.subject_code)
        .bind(paper.year)
        .bind(paper.month.code())
        .bind(paper.file.as_str())
        .bind(&paper.description)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(QuestionPaper {
            id: result.last_insert_rowid(),
            title: paper.title.clone(),
            subject_id: paper.subject_id,
            subject_code: paper.subject_code.clone(),
            year: paper.year,
            month: paper.month,
            file: paper.file.clone(),
            description: paper.description.clone(),
            upload_date: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<QuestionPaper, RepositoryError> {
        let row: PaperRow = sqlx::query_as(&format!(
            "SELECT {PAPER_COLUMNS} FROM question_papers p WHERE p.id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("question paper", id))?;
        row.try_into()
    }

    async fn list_for_subject(
        &self,
        subject_id: i64,
        filter: &PaperFilter,
    ) -> Result<Vec<QuestionPaper>, RepositoryError> {
        // NULL filter values match everything.
        let rows: Vec<PaperRow> = sqlx::query_as(&format!(
            "SELECT {PAPER_COLUMNS} FROM question_papers p
              WHERE p.subject_id = ?
                AND (?2 IS NULL OR p.year = ?2)
                AND (?3 IS NULL OR p.month = ?3)
              {PAPER_ORDER}"
        ))
        .bind(subject_id)
        .bind(filter.year)
        .bind(filter.month.map(|m| m.code()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(QuestionPaper::try_from).collect()
    }

    async fn years_for_subject(&self, subject_id: i64) -> Result<Vec<i32>, RepositoryError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT DISTINCT year FROM question_papers WHERE subject_id = ? ORDER BY year DESC",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|(year,)| year).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<PaperHit>, RepositoryError> {
        let rows: Vec<PaperHitRow> = sqlx::query_as(&format!(
            r"SELECT {PAPER_COLUMNS}, s.name AS subject_name
                FROM question_papers p
                JOIN subjects s ON s.id = p.subject_id
               WHERE p.title LIKE ?1 ESCAPE '\'
                  OR p.subject_code LIKE ?1 ESCAPE '\'
                  OR p.description LIKE ?1 ESCAPE '\'
                  OR s.name LIKE ?1 ESCAPE '\'
               {PAPER_ORDER}"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(PaperHit::try_from).collect()
    }

    async fn recent(&self, limit: u32) -> Result<Vec<PaperHit>, RepositoryError> {
        let rows: Vec<PaperHitRow> = sqlx::query_as(&format!(
            "SELECT {PAPER_COLUMNS}, s.name AS subject_name
               FROM question_papers p
               JOIN subjects s ON s.id = p.subject_id
              ORDER BY p.upload_date DESC, p.id DESC
              LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(PaperHit::try_from).collect()
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM question_papers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }
}
