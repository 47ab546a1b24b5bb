//! `SQLite` implementation of the catalog repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use qpcat_core::domain::{
    CatalogPath, Department, DepartmentSummary, NewDepartment, NewScheme, NewSemester,
    NewSubject, PathSegment, ResolvedSubject, Scheme, Semester, Subject, SubjectSummary,
    semester_label,
};
use qpcat_core::ports::{CatalogRepository, RepositoryError};

use super::row_mappers::{
    DEPARTMENT_COLUMNS, DepartmentRow, SCHEME_COLUMNS, SEMESTER_COLUMNS, SUBJECT_COLUMNS,
    SchemeRow, SemesterRow, SubjectRow, like_pattern, map_sqlx_error, not_found, now,
    semester_number, timestamp,
};

/// `SQLite` implementation of the catalog repository.
pub struct SqliteCatalogRepository {
    pool: SqlitePool,
}

impl SqliteCatalogRepository {
    /// Create a new `SQLite` catalog repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate rows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct DepartmentSummaryRow {
    #[sqlx(flatten)]
    department: DepartmentRow,
    subject_count: i64,
}

#[derive(sqlx::FromRow)]
struct SubjectSummaryRow {
    #[sqlx(flatten)]
    subject: SubjectRow,
    paper_count: i64,
}

/// Subject joined with its ancestry.
#[derive(sqlx::FromRow)]
struct ResolvedRow {
    #[sqlx(flatten)]
    subject: SubjectRow,
    sem_number: i64,
    sem_slug: String,
    scheme_id: i64,
    scheme_year: i32,
    scheme_slug: String,
    dept_id: i64,
    dept_name: String,
    dept_slug: String,
}

impl TryFrom<ResolvedRow> for ResolvedSubject {
    type Error = RepositoryError;

    fn try_from(row: ResolvedRow) -> Result<Self, Self::Error> {
        let subject = Subject::from(row.subject);
        let path = CatalogPath {
            department: PathSegment {
                id: row.dept_id,
                label: row.dept_name,
                slug: row.dept_slug,
            },
            scheme: PathSegment {
                id: row.scheme_id,
                label: row.scheme_year.to_string(),
                slug: row.scheme_slug,
            },
            semester: PathSegment {
                id: subject.semester_id,
                label: semester_label(semester_number(row.sem_number)?),
                slug: row.sem_slug,
            },
            subject: PathSegment {
                id: subject.id,
                label: subject.label(),
                slug: subject.slug.clone(),
            },
        };
        Ok(Self { subject, path })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn insert_department(&self, new: &NewDepartment) -> Result<Department, RepositoryError> {
        let now = now();
        let slug = new.effective_slug();
        let result = sqlx::query(
            "INSERT INTO departments (name, slug, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&slug)
        .bind(&new.description)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Department {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, RepositoryError> {
        let rows: Vec<DepartmentSummaryRow> = sqlx::query_as(
            r"
            SELECT d.id, d.name, d.slug, d.description, d.created_at, d.updated_at,
                   (SELECT COUNT(*)
                      FROM subjects s
                      JOIN semesters sem ON sem.id = s.semester_id
                      JOIN schemes sc ON sc.id = sem.scheme_id
                     WHERE sc.department_id = d.id) AS subject_count
              FROM departments d
             ORDER BY d.name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| DepartmentSummary {
                department: r.department.into(),
                subject_count: r.subject_count,
            })
            .collect())
    }

    async fn get_department(&self, id: i64) -> Result<Department, RepositoryError> {
        let row: DepartmentRow = sqlx::query_as(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("department", id))?;
        Ok(row.into())
    }

    async fn get_department_by_slug(&self, slug: &str) -> Result<Department, RepositoryError> {
        let row: DepartmentRow = sqlx::query_as(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("department", slug))?;
        Ok(row.into())
    }

    async fn insert_scheme(&self, new: &NewScheme) -> Result<Scheme, RepositoryError> {
        let now = now();
        let slug = new.effective_slug();
        let result = sqlx::query(
            "INSERT INTO schemes (department_id, year, slug, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.department_id)
        .bind(new.year)
        .bind(&slug)
        .bind(&new.description)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Scheme {
            id: result.last_insert_rowid(),
            department_id: new.department_id,
            year: new.year,
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_schemes(&self, department_id: i64) -> Result<Vec<Scheme>, RepositoryError> {
        let rows: Vec<SchemeRow> = sqlx::query_as(&format!(
            "SELECT {SCHEME_COLUMNS} FROM schemes WHERE department_id = ? ORDER BY year DESC"
        ))
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Scheme::from).collect())
    }

    async fn get_scheme(&self, id: i64) -> Result<Scheme, RepositoryError> {
        let row: SchemeRow = sqlx::query_as(&format!(
            "SELECT {SCHEME_COLUMNS} FROM schemes WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("scheme", id))?;
        Ok(row.into())
    }

    async fn get_scheme_by_slug(
        &self,
        department_id: i64,
        slug: &str,
    ) -> Result<Scheme, RepositoryError> {
        let row: SchemeRow = sqlx::query_as(&format!(
            "SELECT {SCHEME_COLUMNS} FROM schemes WHERE department_id = ? AND slug = ?"
        ))
        .bind(department_id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("scheme", slug))?;
        Ok(row.into())
    }

    async fn insert_semester(&self, new: &NewSemester) -> Result<Semester, RepositoryError> {
        let now = now();
        let slug = new.effective_slug();
        let result = sqlx::query(
            "INSERT INTO semesters (scheme_id, number, slug, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new.scheme_id)
        .bind(i64::from(new.number))
        .bind(&slug)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Semester {
            id: result.last_insert_rowid(),
            scheme_id: new.scheme_id,
            number: new.number,
            slug,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_semesters(&self, scheme_id: i64) -> Result<Vec<Semester>, RepositoryError> {
        let rows: Vec<SemesterRow> = sqlx::query_as(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE scheme_id = ? ORDER BY number"
        ))
        .bind(scheme_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(Semester::try_from).collect()
    }

    async fn get_semester(&self, id: i64) -> Result<Semester, RepositoryError> {
        let row: SemesterRow = sqlx::query_as(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("semester", id))?;
        row.try_into()
    }

    async fn get_semester_by_slug(
        &self,
        scheme_id: i64,
        slug: &str,
    ) -> Result<Semester, RepositoryError> {
        let row: SemesterRow = sqlx::query_as(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE scheme_id = ? AND slug = ?"
        ))
        .bind(scheme_id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("semester", slug))?;
        row.try_into()
    }

    async fn insert_subject(&self, new: &NewSubject) -> Result<Subject, RepositoryError> {
        let now = now();
        let slug = new.effective_slug();
        let code = new.subject_code.trim().to_string();
        let result = sqlx::query(
            "INSERT INTO subjects (semester_id, name, subject_code, slug, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.semester_id)
        .bind(&new.name)
        .bind(&code)
        .bind(&slug)
        .bind(&new.description)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Subject {
            id: result.last_insert_rowid(),
            semester_id: new.semester_id,
            name: new.name.clone(),
            subject_code: code,
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_subjects(
        &self,
        semester_id: i64,
    ) -> Result<Vec<SubjectSummary>, RepositoryError> {
        let rows: Vec<SubjectSummaryRow> = sqlx::query_as(
            r"
            SELECT s.id, s.semester_id, s.name, s.subject_code, s.slug, s.description,
                   s.created_at, s.updated_at,
                   (SELECT COUNT(*) FROM question_papers p WHERE p.subject_id = s.id) AS paper_count
              FROM subjects s
             WHERE s.semester_id = ?
             ORDER BY s.name
            ",
        )
        .bind(semester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| SubjectSummary {
                subject: r.subject.into(),
                paper_count: r.paper_count,
            })
            .collect())
    }

    async fn get_subject(&self, id: i64) -> Result<Subject, RepositoryError> {
        let row: SubjectRow = sqlx::query_as(&format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("subject", id))?;
        Ok(row.into())
    }

    async fn get_subject_by_slug(
        &self,
        semester_id: i64,
        slug: &str,
    ) -> Result<Subject, RepositoryError> {
        let row: SubjectRow = sqlx::query_as(&format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE semester_id = ? AND slug = ?"
        ))
        .bind(semester_id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("subject", slug))?;
        Ok(row.into())
    }

    async fn resolve_subject(&self, subject_id: i64) -> Result<ResolvedSubject, RepositoryError> {
        let row: ResolvedRow = sqlx::query_as(
            r"
            SELECT s.id, s.semester_id, s.name, s.subject_code, s.slug, s.description,
                   s.created_at, s.updated_at,
                   sem.number AS sem_number, sem.slug AS sem_slug,
                   sc.id AS scheme_id, sc.year AS scheme_year, sc.slug AS scheme_slug,
                   d.id AS dept_id, d.name AS dept_name, d.slug AS dept_slug
              FROM subjects s
              JOIN semesters sem ON sem.id = s.semester_id
              JOIN schemes sc ON sc.id = sem.scheme_id
              JOIN departments d ON d.id = sc.department_id
             WHERE s.id = ?
            ",
        )
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("subject", subject_id))?;
        row.try_into()
    }

    async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, RepositoryError> {
        let rows: Vec<SubjectRow> = sqlx::query_as(&format!(
            r"SELECT {SUBJECT_COLUMNS} FROM subjects
               WHERE name LIKE ?1 ESCAPE '\'
                  OR subject_code LIKE ?1 ESCAPE '\'
                  OR description LIKE ?1 ESCAPE '\'
               ORDER BY name"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn search_departments(&self, query: &str) -> Result<Vec<Department>, RepositoryError> {
        let rows: Vec<DepartmentRow> = sqlx::query_as(&format!(
            r"SELECT {DEPARTMENT_COLUMNS} FROM departments
               WHERE name LIKE ?1 ESCAPE '\'
                  OR description LIKE ?1 ESCAPE '\'
               ORDER BY name"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn count_departments(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn count_subjects(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }
}
