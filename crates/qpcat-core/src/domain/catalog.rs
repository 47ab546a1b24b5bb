//! Catalog hierarchy types.
//!
//! The catalog is a four-level tree: Department → Scheme → Semester → Subject.
//! Every node carries a slug that is unique among its siblings, so a full
//! chain of four slugs identifies exactly one subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::slugify;

/// Display names for semester numbers 1 through 8.
pub const SEMESTER_NAMES: [&str; 8] = [
    "First Semester",
    "Second Semester",
    "Third Semester",
    "Fourth Semester",
    "Fifth Semester",
    "Sixth Semester",
    "Seventh Semester",
    "Eighth Semester",
];

/// Human name for a semester number, if it is in range.
pub fn semester_name(number: u8) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|idx| SEMESTER_NAMES.get(usize::from(idx)))
        .copied()
}

/// `Third Semester`, or `Semester 9` for numbers outside the named range.
pub fn semester_label(number: u8) -> String {
    semester_name(number).map_or_else(|| format!("Semester {number}"), String::from)
}

/// Use the explicit slug when one was supplied, otherwise derive it.
fn slug_or(explicit: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    match explicit.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => fallback(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Department
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    /// Globally unique slug.
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A department to be inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    /// Explicit slug; derived from `name` when blank.
    pub slug: Option<String>,
    pub description: String,
}

impl NewDepartment {
    /// Create a department with a derived slug and no description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The slug that will be stored.
    pub fn effective_slug(&self) -> String {
        slug_or(self.slug.as_deref(), || slugify(&self.name))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheme
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted scheme (syllabus revision year) within a department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scheme {
    pub id: i64,
    pub department_id: i64,
    pub year: i32,
    /// Unique among the department's schemes.
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scheme {
    /// Short label used in selection lists.
    pub fn label(&self) -> String {
        self.year.to_string()
    }

    /// Long display form, e.g. `2021 - Computer Science`.
    pub fn display_with(&self, department: &Department) -> String {
        format!("{} - {}", self.year, department.name)
    }
}

/// A scheme to be inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewScheme {
    pub department_id: i64,
    pub year: i32,
    pub slug: Option<String>,
    pub description: String,
}

impl NewScheme {
    pub fn new(department_id: i64, year: i32) -> Self {
        Self {
            department_id,
            year,
            ..Self::default()
        }
    }

    pub fn effective_slug(&self) -> String {
        slug_or(self.slug.as_deref(), || slugify(&self.year.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Semester
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted semester within a scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Semester {
    pub id: i64,
    pub scheme_id: i64,
    /// Semester number, 1 through 8.
    pub number: u8,
    /// Unique among the scheme's semesters.
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Semester {
    pub fn label(&self) -> String {
        semester_label(self.number)
    }
}

/// A semester to be inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSemester {
    pub scheme_id: i64,
    pub number: u8,
    pub slug: Option<String>,
}

impl NewSemester {
    pub fn new(scheme_id: i64, number: u8) -> Self {
        Self {
            scheme_id,
            number,
            slug: None,
        }
    }

    pub fn effective_slug(&self) -> String {
        slug_or(self.slug.as_deref(), || {
            slugify(&format!("semester-{}", self.number))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subject
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted subject, the leaf of the catalog path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: i64,
    pub semester_id: i64,
    pub name: String,
    /// Course code such as `CS301`; empty when the subject has none.
    pub subject_code: String,
    /// Unique among the semester's subjects.
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// `[CS301] Operating Systems`, or just the name when there is no code.
    pub fn label(&self) -> String {
        if self.subject_code.is_empty() {
            self.name.clone()
        } else {
            format!("[{}] {}", self.subject_code, self.name)
        }
    }
}

/// A subject to be inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubject {
    pub semester_id: i64,
    pub name: String,
    pub subject_code: String,
    pub slug: Option<String>,
    pub description: String,
}

impl NewSubject {
    pub fn new(semester_id: i64, name: impl Into<String>) -> Self {
        Self {
            semester_id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.subject_code = code.into();
        self
    }

    pub fn effective_slug(&self) -> String {
        slug_or(self.slug.as_deref(), || slugify(&self.name))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paths and listings
// ─────────────────────────────────────────────────────────────────────────────

/// One level of a catalog path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathSegment {
    pub id: i64,
    pub label: String,
    pub slug: String,
}

/// Fully resolved Department → Scheme → Semester → Subject chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogPath {
    pub department: PathSegment,
    pub scheme: PathSegment,
    pub semester: PathSegment,
    pub subject: PathSegment,
}

impl CatalogPath {
    /// The four slugs, root first.
    pub fn slugs(&self) -> [&str; 4] {
        [
            &self.department.slug,
            &self.scheme.slug,
            &self.semester.slug,
            &self.subject.slug,
        ]
    }

    /// Browser page path for the subject, e.g. `/cse/2021/semester-3/dbms/`.
    ///
    /// This is the front-end route; the JSON API serves the same chain under
    /// `/api/catalog/`.
    pub fn url_path(&self) -> String {
        format!("/{}/", self.slugs().join("/"))
    }

    /// Directory under the storage root where the subject's files live.
    pub fn storage_dir(&self) -> String {
        self.slugs().join("/")
    }
}

/// A subject together with its full ancestry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedSubject {
    pub subject: Subject,
    pub path: CatalogPath,
}

/// Department plus the number of subjects beneath it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentSummary {
    pub department: Department,
    pub subject_count: i64,
}

/// Subject plus the number of question papers filed under it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectSummary {
    pub subject: Subject,
    pub paper_count: i64,
}

/// Entry in a cascading selection list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChildOption {
    pub id: i64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: i64, slug: &str) -> PathSegment {
        PathSegment {
            id,
            label: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    fn sample_path() -> CatalogPath {
        CatalogPath {
            department: segment(1, "cse"),
            scheme: segment(2, "2021"),
            semester: segment(3, "semester-3"),
            subject: segment(4, "dbms"),
        }
    }

    #[test]
    fn test_semester_name_range() {
        assert_eq!(semester_name(1), Some("First Semester"));
        assert_eq!(semester_name(8), Some("Eighth Semester"));
        assert_eq!(semester_name(0), None);
        assert_eq!(semester_name(9), None);
    }

    #[test]
    fn test_effective_slugs_derive_from_labels() {
        assert_eq!(NewDepartment::new("Civil Engineering").effective_slug(), "civil-engineering");
        assert_eq!(NewScheme::new(1, 2018).effective_slug(), "2018");
        assert_eq!(NewSemester::new(1, 4).effective_slug(), "semester-4");
        assert_eq!(NewSubject::new(1, "Fluid Mechanics").effective_slug(), "fluid-mechanics");
    }

    #[test]
    fn test_explicit_slug_wins_unless_blank() {
        let mut dept = NewDepartment::new("Computer Science");
        dept.slug = Some("cse".to_string());
        assert_eq!(dept.effective_slug(), "cse");

        dept.slug = Some("   ".to_string());
        assert_eq!(dept.effective_slug(), "computer-science");
    }

    #[test]
    fn test_catalog_path_urls() {
        let path = sample_path();
        assert_eq!(path.url_path(), "/cse/2021/semester-3/dbms/");
        assert_eq!(path.storage_dir(), "cse/2021/semester-3/dbms");
    }
}
