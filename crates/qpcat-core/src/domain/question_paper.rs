//! Question paper types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::Subject;

// ─────────────────────────────────────────────────────────────────────────────
// Month
// ─────────────────────────────────────────────────────────────────────────────

/// Examination month. Stored and transmitted as a three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    #[default]
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    /// Three-letter lowercase code, as persisted.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Jan => "jan",
            Self::Feb => "feb",
            Self::Mar => "mar",
            Self::Apr => "apr",
            Self::May => "may",
            Self::Jun => "jun",
            Self::Jul => "jul",
            Self::Aug => "aug",
            Self::Sep => "sep",
            Self::Oct => "oct",
            Self::Nov => "nov",
            Self::Dec => "dec",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Jan => "January",
            Self::Feb => "February",
            Self::Mar => "March",
            Self::Apr => "April",
            Self::May => "May",
            Self::Jun => "June",
            Self::Jul => "July",
            Self::Aug => "August",
            Self::Sep => "September",
            Self::Oct => "October",
            Self::Nov => "November",
            Self::Dec => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a month code is not one of the twelve known codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown month code '{0}' (expected one of jan..dec)")]
pub struct ParseMonthError(pub String);

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| ParseMonthError(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File reference
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque reference to stored file bytes.
///
/// Holds the key the storage backend assigned on write, relative to the
/// storage root (e.g. `cse/2021/semester-3/dbms/Midterm.pdf`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component of the stored key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Question paper
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted question paper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionPaper {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
    /// Code captured when the record was created; not re-derived later.
    pub subject_code: String,
    pub year: i32,
    pub month: Month,
    pub file: FileRef,
    pub description: String,
    pub upload_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionPaper {
    /// `[CS301] Midterm - Operating Systems (March 2023)`.
    pub fn display_with(&self, subject_name: &str) -> String {
        let code = if self.subject_code.is_empty() {
            String::new()
        } else {
            format!("[{}] ", self.subject_code)
        };
        format!(
            "{code}{} - {subject_name} ({} {})",
            self.title, self.month, self.year
        )
    }

    /// Name of the stored file, used as the download filename.
    pub fn filename(&self) -> &str {
        self.file.file_name()
    }
}

/// A question paper to be inserted.
///
/// Construction requires a [`FileRef`], so a record can only be persisted
/// once its bytes have been stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestionPaper {
    pub title: String,
    pub subject_id: i64,
    pub subject_code: String,
    pub year: i32,
    pub month: Month,
    pub file: FileRef,
    pub description: String,
}

impl NewQuestionPaper {
    /// Build a record for `subject`.
    ///
    /// A non-blank `explicit_code` is kept as is; otherwise the subject's own
    /// code is copied in.
    pub fn for_subject(
        title: impl Into<String>,
        subject: &Subject,
        explicit_code: Option<&str>,
        year: i32,
        month: Month,
        file: FileRef,
    ) -> Self {
        let subject_code = match explicit_code.map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => subject.subject_code.clone(),
        };
        Self {
            title: title.into(),
            subject_id: subject.id,
            subject_code,
            year,
            month,
            file,
            description: String::new(),
        }
    }
}

/// Optional filters for a subject's paper listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperFilter {
    pub year: Option<i32>,
    pub month: Option<Month>,
}

/// A paper with the name of its subject, for cross-subject listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaperHit {
    pub paper: QuestionPaper,
    pub subject_name: String,
}
