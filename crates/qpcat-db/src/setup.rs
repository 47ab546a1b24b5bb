//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path.

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use std::path::Path;
use tracing::debug;

/// Opens (creating if missing) the `SQLite` database and ensures the schema exists.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The database file cannot be opened or created
/// - Schema creation fails
///
/// # Example
///
/// ```rust,no_run
/// use qpcat_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/var/lib/qpcat/data/qpcat.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true),
    )
    .await?;

    create_schema(&pool).await?;
    debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// Sets up an in-memory `SQLite` database with the full production schema.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is held to a single connection.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Creates all tables and indexes. Safe to call repeatedly.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS schemes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (department_id, year),
            UNIQUE (department_id, slug),
            FOREIGN KEY (department_id) REFERENCES departments(id) ON DELETE CASCADE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS semesters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scheme_id INTEGER NOT NULL,
            number INTEGER NOT NULL CHECK (number BETWEEN 1 AND 8),
            slug TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (scheme_id, number),
            UNIQUE (scheme_id, slug),
            FOREIGN KEY (scheme_id) REFERENCES schemes(id) ON DELETE CASCADE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS subjects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            semester_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            subject_code TEXT NOT NULL DEFAULT '',
            slug TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (semester_id, name),
            UNIQUE (semester_id, slug),
            FOREIGN KEY (semester_id) REFERENCES semesters(id) ON DELETE CASCADE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS question_papers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            subject_id INTEGER NOT NULL,
            subject_code TEXT NOT NULL DEFAULT '',
            year INTEGER NOT NULL,
            month TEXT NOT NULL CHECK (month IN (
                'jan', 'feb', 'mar', 'apr', 'may', 'jun',
                'jul', 'aug', 'sep', 'oct', 'nov', 'dec'
            )),
            file TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            upload_date TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES subjects(id) ON DELETE CASCADE
        )
        ",
    )
    .execute(pool)
    .await?;

    // Subject page listing: filter by subject, newest year first
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_question_papers_subject ON question_papers(subject_id, year DESC)",
    )
    .execute(pool)
    .await?;

    // Dashboard "recent uploads"
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_question_papers_upload ON question_papers(upload_date DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
