//! Row types and mapping helpers for `SQLite` queries.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use qpcat_core::domain::{
    Department, FileRef, Month, QuestionPaper, Scheme, Semester, Subject,
};
use qpcat_core::RepositoryError;

/// Shared SELECT column lists, unqualified.
pub const DEPARTMENT_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";
pub const SCHEME_COLUMNS: &str =
    "id, department_id, year, slug, description, created_at, updated_at";
pub const SEMESTER_COLUMNS: &str = "id, scheme_id, number, slug, created_at, updated_at";
pub const SUBJECT_COLUMNS: &str =
    "id, semester_id, name, subject_code, slug, description, created_at, updated_at";

/// Current time at the precision [`timestamp`] stores, so a record returned
/// from an insert equals the row read back later.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `%{query}%` with LIKE wildcards escaped; pair with `ESCAPE '\'`.
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Map `sqlx` errors to repository errors.
pub fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(e.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::AlreadyExists(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() || db.is_check_violation() => {
            RepositoryError::Constraint(db.message().to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::Serialization(e.to_string())
        }
        _ => RepositoryError::Storage(e.to_string()),
    }
}

/// Turn `RowNotFound` into a `NotFound` that names what was looked up.
pub fn not_found(what: &str, key: impl std::fmt::Display) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    let label = format!("{what} {key}");
    move |e| match e {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(label),
        other => map_sqlx_error(other),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SchemeRow {
    pub id: i64,
    pub department_id: i64,
    pub year: i32,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SchemeRow> for Scheme {
    fn from(row: SchemeRow) -> Self {
        Self {
            id: row.id,
            department_id: row.department_id,
            year: row.year,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SemesterRow {
    pub id: i64,
    pub scheme_id: i64,
    pub number: i64,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SemesterRow> for Semester {
    type Error = RepositoryError;

    fn try_from(row: SemesterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            scheme_id: row.scheme_id,
            number: semester_number(row.number)?,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub fn semester_number(raw: i64) -> Result<u8, RepositoryError> {
    u8::try_from(raw)
        .map_err(|_| RepositoryError::Serialization(format!("semester number out of range: {raw}")))
}

#[derive(sqlx::FromRow)]
pub struct SubjectRow {
    pub id: i64,
    pub semester_id: i64,
    pub name: String,
    pub subject_code: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            semester_id: row.semester_id,
            name: row.name,
            subject_code: row.subject_code,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct PaperRow {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
    pub subject_code: String,
    pub year: i32,
    pub month: String,
    pub file: String,
    pub description: String,
    pub upload_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PaperRow> for QuestionPaper {
    type Error = RepositoryError;

    fn try_from(row: PaperRow) -> Result<Self, Self::Error> {
        let month: Month = row
            .month
            .parse()
            .map_err(|e: qpcat_core::domain::ParseMonthError| {
                RepositoryError::Serialization(e.to_string())
            })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            subject_id: row.subject_id,
            subject_code: row.subject_code,
            year: row.year,
            month,
            file: FileRef::new(row.file),
            description: row.description,
            upload_date: row.upload_date,
            updated_at: row.updated_at,
        })
    }
}
