//! Catalog service - administration, browsing, lookups, search and stats.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    CatalogPath, ChildOption, Department, DepartmentSummary, NewDepartment, NewScheme,
    NewSemester, NewSubject, PaperFilter, PaperHit, QuestionPaper, ResolvedSubject, Scheme,
    Semester, Subject, SubjectSummary, SEMESTER_NAMES, is_valid_slug,
};
use crate::ports::{CatalogRepository, CoreError, QuestionPaperRepository};

/// Number of papers shown on the dashboard.
pub const RECENT_PAPERS_LIMIT: u32 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Page payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentPage {
    pub department: Department,
    pub schemes: Vec<Scheme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemePage {
    pub department: Department,
    pub scheme: Scheme,
    pub semesters: Vec<Semester>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemesterPage {
    pub department: Department,
    pub scheme: Scheme,
    pub semester: Semester,
    pub subjects: Vec<SubjectSummary>,
}

/// A subject's papers after filtering, plus the years available to filter by.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectPage {
    pub path: CatalogPath,
    pub subject: Subject,
    pub papers: Vec<QuestionPaper>,
    pub years: Vec<i32>,
    pub filter: PaperFilter,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub papers: Vec<PaperHit>,
    pub subjects: Vec<Subject>,
    pub departments: Vec<Department>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty() && self.subjects.is_empty() && self.departments.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub department_count: i64,
    pub subject_count: i64,
    pub paper_count: i64,
    pub recent_papers: Vec<PaperHit>,
}

/// Whole catalog nested for display (`qpcat tree`).
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentBranch {
    pub department: Department,
    pub schemes: Vec<SchemeBranch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemeBranch {
    pub scheme: Scheme,
    pub semesters: Vec<SemesterBranch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemesterBranch {
    pub semester: Semester,
    pub subjects: Vec<SubjectSummary>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

/// Service for catalog operations.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    papers: Arc<dyn QuestionPaperRepository>,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        papers: Arc<dyn QuestionPaperRepository>,
    ) -> Self {
        Self { catalog, papers }
    }

    // Administration

    pub async fn create_department(&self, new: NewDepartment) -> Result<Department, CoreError> {
        require_text("Department name", &new.name)?;
        require_slug(&new.effective_slug())?;
        Ok(self.catalog.insert_department(&new).await?)
    }

    pub async fn create_scheme(&self, new: NewScheme) -> Result<Scheme, CoreError> {
        self.catalog.get_department(new.department_id).await?;
        require_slug(&new.effective_slug())?;
        Ok(self.catalog.insert_scheme(&new).await?)
    }

    /// Semester numbers are limited to 1 through 8.
    pub async fn create_semester(&self, new: NewSemester) -> Result<Semester, CoreError> {
        if !(1..=SEMESTER_NAMES.len()).contains(&usize::from(new.number)) {
            return Err(CoreError::Validation(format!(
                "Semester number must be between 1 and {}, got {}",
                SEMESTER_NAMES.len(),
                new.number
            )));
        }
        require_slug(&new.effective_slug())?;
        self.catalog.get_scheme(new.scheme_id).await?;
        Ok(self.catalog.insert_semester(&new).await?)
    }

    pub async fn create_subject(&self, new: NewSubject) -> Result<Subject, CoreError> {
        require_text("Subject name", &new.name)?;
        require_slug(&new.effective_slug())?;
        self.catalog.get_semester(new.semester_id).await?;
        Ok(self.catalog.insert_subject(&new).await?)
    }

    // Browsing

    /// Home listing: every department with its subject count.
    pub async fn departments(&self) -> Result<Vec<DepartmentSummary>, CoreError> {
        Ok(self.catalog.list_departments().await?)
    }

    pub async fn department_page(&self, dept_slug: &str) -> Result<DepartmentPage, CoreError> {
        let department = self.catalog.get_department_by_slug(dept_slug).await?;
        let schemes = self.catalog.list_schemes(department.id).await?;
        Ok(DepartmentPage {
            department,
            schemes,
        })
    }

    pub async fn scheme_page(
        &self,
        dept_slug: &str,
        scheme_slug: &str,
    ) -> Result<SchemePage, CoreError> {
        let department = self.catalog.get_department_by_slug(dept_slug).await?;
        let scheme = self
            .catalog
            .get_scheme_by_slug(department.id, scheme_slug)
            .await?;
        let semesters = self.catalog.list_semesters(scheme.id).await?;
        Ok(SchemePage {
            department,
            scheme,
            semesters,
        })
    }

    pub async fn semester_page(
        &self,
        dept_slug: &str,
        scheme_slug: &str,
        sem_slug: &str,
    ) -> Result<SemesterPage, CoreError> {
        let SchemePage {
            department, scheme, ..
        } = self.scheme_page(dept_slug, scheme_slug).await?;
        let semester = self.catalog.get_semester_by_slug(scheme.id, sem_slug).await?;
        let subjects = self.catalog.list_subjects(semester.id).await?;
        Ok(SemesterPage {
            department,
            scheme,
            semester,
            subjects,
        })
    }

    /// Resolve a four-slug chain and list the subject's papers.
    pub async fn subject_page(
        &self,
        slugs: [&str; 4],
        filter: PaperFilter,
    ) -> Result<SubjectPage, CoreError> {
        let [dept_slug, scheme_slug, sem_slug, subj_slug] = slugs;
        let department = self.catalog.get_department_by_slug(dept_slug).await?;
        let scheme = self
            .catalog
            .get_scheme_by_slug(department.id, scheme_slug)
            .await?;
        let semester = self.catalog.get_semester_by_slug(scheme.id, sem_slug).await?;
        let subject = self
            .catalog
            .get_subject_by_slug(semester.id, subj_slug)
            .await?;

        let ResolvedSubject { subject, path } = self.catalog.resolve_subject(subject.id).await?;
        let papers = self.papers.list_for_subject(subject.id, &filter).await?;
        let years = self.papers.years_for_subject(subject.id).await?;
        Ok(SubjectPage {
            path,
            subject,
            papers,
            years,
            filter,
        })
    }

    /// Subject plus its full ancestry.
    pub async fn resolve_subject(&self, subject_id: i64) -> Result<ResolvedSubject, CoreError> {
        Ok(self.catalog.resolve_subject(subject_id).await?)
    }

    /// The whole catalog, nested.
    pub async fn tree(&self) -> Result<Vec<DepartmentBranch>, CoreError> {
        let mut branches = Vec::new();
        for summary in self.catalog.list_departments().await? {
            let mut schemes = Vec::new();
            for scheme in self.catalog.list_schemes(summary.department.id).await? {
                let mut semesters = Vec::new();
                for semester in self.catalog.list_semesters(scheme.id).await? {
                    let subjects = self.catalog.list_subjects(semester.id).await?;
                    semesters.push(SemesterBranch { semester, subjects });
                }
                schemes.push(SchemeBranch { scheme, semesters });
            }
            branches.push(DepartmentBranch {
                department: summary.department,
                schemes,
            });
        }
        Ok(branches)
    }

    // Cascading lookups

    pub async fn scheme_options(&self, department_id: i64) -> Result<Vec<ChildOption>, CoreError> {
        let schemes = self.catalog.list_schemes(department_id).await?;
        Ok(schemes
            .iter()
            .map(|s| ChildOption {
                id: s.id,
                label: s.label(),
            })
            .collect())
    }

    pub async fn semester_options(&self, scheme_id: i64) -> Result<Vec<ChildOption>, CoreError> {
        let semesters = self.catalog.list_semesters(scheme_id).await?;
        Ok(semesters
            .iter()
            .map(|s| ChildOption {
                id: s.id,
                label: s.label(),
            })
            .collect())
    }

    pub async fn subject_options(&self, semester_id: i64) -> Result<Vec<ChildOption>, CoreError> {
        let subjects = self.catalog.list_subjects(semester_id).await?;
        Ok(subjects
            .iter()
            .map(|s| ChildOption {
                id: s.subject.id,
                label: s.subject.label(),
            })
            .collect())
    }

    // Search and stats

    /// Case-insensitive substring search. A blank query returns nothing.
    pub async fn search(&self, query: &str) -> Result<SearchResults, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }
        Ok(SearchResults {
            query: query.to_string(),
            papers: self.papers.search(query).await?,
            subjects: self.catalog.search_subjects(query).await?,
            departments: self.catalog.search_departments(query).await?,
        })
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, CoreError> {
        Ok(DashboardStats {
            department_count: self.catalog.count_departments().await?,
            subject_count: self.catalog.count_subjects().await?,
            paper_count: self.papers.count().await?,
            recent_papers: self.papers.recent(RECENT_PAPERS_LIMIT).await?,
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// A name made only of punctuation would slugify to nothing.
/// Slugs become storage key segments and URL path segments, so anything
/// beyond `[-a-zA-Z0-9_]` is refused.
fn require_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Name must contain at least one letter or digit".to_string(),
        ));
    }
    if !is_valid_slug(slug) {
        return Err(CoreError::Validation(format!(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens. Got '{slug}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FileRef, Month, NewQuestionPaper};
    use crate::ports::RepositoryError;
    use crate::testing::{MemoryCatalog, MemoryPapers};

    struct Fixture {
        service: CatalogService,
        papers: Arc<MemoryPapers>,
    }

    fn fixture() -> Fixture {
        let papers = Arc::new(MemoryPapers::default());
        let service = CatalogService::new(Arc::new(MemoryCatalog::default()), papers.clone());
        Fixture { service, papers }
    }

    /// CSE → 2021 → semester 3 → DBMS; returns the subject.
    async fn seed(service: &CatalogService) -> Subject {
        let dept = service
            .create_department(NewDepartment::new("Computer Science"))
            .await
            .unwrap();
        let scheme = service
            .create_scheme(NewScheme::new(dept.id, 2021))
            .await
            .unwrap();
        let semester = service
            .create_semester(NewSemester::new(scheme.id, 3))
            .await
            .unwrap();
        service
            .create_subject(NewSubject::new(semester.id, "Database Systems").with_code("CS305"))
            .await
            .unwrap()
    }

    async fn add_paper(papers: &MemoryPapers, subject: &Subject, title: &str, year: i32, month: Month) {
        let file = FileRef::new(format!("x/{title}.pdf"));
        papers
            .insert(&NewQuestionPaper::for_subject(title, subject, None, year, month, file))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_blank_names_and_bad_semesters() {
        let fx = fixture();
        let err = fx
            .service
            .create_department(NewDepartment::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = fx
            .service
            .create_department(NewDepartment::new("!!!"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let subject = seed(&fx.service).await;
        for number in [0, 9] {
            let err = fx
                .service
                .create_semester(NewSemester::new(1, number))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{number}");
        }

        let err = fx
            .service
            .create_subject(NewSubject::new(subject.semester_id, "Database Systems"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Repository(RepositoryError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_explicit_slugs_must_be_url_safe() {
        let fx = fixture();
        let subject = seed(&fx.service).await;
        let semester = fx.service.catalog.get_semester(subject.semester_id).await.unwrap();
        let scheme = fx.service.catalog.get_scheme(semester.scheme_id).await.unwrap();

        for bad in ["cse/../x y", "..", "a b", "a.b"] {
            let err = fx
                .service
                .create_department(NewDepartment {
                    name: format!("Dept {bad}"),
                    slug: Some(bad.to_string()),
                    description: String::new(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{bad}");
        }

        let err = fx
            .service
            .create_scheme(NewScheme {
                department_id: scheme.department_id,
                year: 2024,
                slug: Some("2024/extra".to_string()),
                description: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = fx
            .service
            .create_semester(NewSemester {
                scheme_id: scheme.id,
                number: 4,
                slug: Some("../semester-4".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = fx
            .service
            .create_subject(NewSubject {
                slug: Some("data base".to_string()),
                ..NewSubject::new(subject.semester_id, "Compilers")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let ok = fx
            .service
            .create_subject(NewSubject {
                slug: Some("compilers_2".to_string()),
                ..NewSubject::new(subject.semester_id, "Compilers")
            })
            .await
            .unwrap();
        assert_eq!(ok.slug, "compilers_2");
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .create_scheme(NewScheme::new(42, 2020))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Repository(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_browse_by_slug_chain() {
        let fx = fixture();
        let subject = seed(&fx.service).await;
        add_paper(&fx.papers, &subject, "Midterm", 2022, Month::Mar).await;
        add_paper(&fx.papers, &subject, "Endterm", 2023, Month::Dec).await;
        add_paper(&fx.papers, &subject, "Supplementary", 2022, Month::Jul).await;

        let home = fx.service.departments().await.unwrap();
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].subject_count, 1);

        let dept = fx.service.department_page("computer-science").await.unwrap();
        assert_eq!(dept.schemes.len(), 1);

        let sem = fx
            .service
            .semester_page("computer-science", "2021", "semester-3")
            .await
            .unwrap();
        assert_eq!(sem.subjects[0].subject.slug, "database-systems");

        let page = fx
            .service
            .subject_page(
                ["computer-science", "2021", "semester-3", "database-systems"],
                PaperFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.path.url_path(), "/computer-science/2021/semester-3/database-systems/");
        assert_eq!(page.years, vec![2023, 2022]);
        let titles: Vec<&str> = page.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Endterm", "Supplementary", "Midterm"]);

        let filtered = fx
            .service
            .subject_page(
                ["computer-science", "2021", "semester-3", "database-systems"],
                PaperFilter {
                    year: Some(2022),
                    month: Some(Month::Mar),
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.papers.len(), 1);
        assert_eq!(filtered.papers[0].title, "Midterm");
        assert_eq!(filtered.years, vec![2023, 2022]);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let fx = fixture();
        seed(&fx.service).await;
        let err = fx
            .service
            .scheme_page("computer-science", "1999")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Repository(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lookups_project_children() {
        let fx = fixture();
        let subject = seed(&fx.service).await;

        let schemes = fx.service.scheme_options(1).await.unwrap();
        assert_eq!(schemes, vec![ChildOption { id: 1, label: "2021".to_string() }]);

        let semesters = fx.service.semester_options(1).await.unwrap();
        assert_eq!(semesters[0].label, "Third Semester");

        let subjects = fx.service.subject_options(subject.semester_id).await.unwrap();
        assert_eq!(subjects[0].label, "[CS305] Database Systems");

        assert!(fx.service.subject_options(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_every_kind_and_ignores_blank() {
        let fx = fixture();
        let subject = seed(&fx.service).await;
        fx.papers.name_subject(subject.id, &subject.name);
        add_paper(&fx.papers, &subject, "Database Midterm", 2022, Month::Mar).await;

        assert!(fx.service.search("  ").await.unwrap().is_empty());

        let results = fx.service.search("DATABASE").await.unwrap();
        assert_eq!(results.query, "DATABASE");
        assert_eq!(results.papers.len(), 1);
        assert_eq!(results.papers[0].subject_name, "Database Systems");
        assert_eq!(results.subjects.len(), 1);
        assert!(results.departments.is_empty());

        let by_code = fx.service.search("cs305").await.unwrap();
        assert_eq!(by_code.papers.len(), 1);
        assert_eq!(by_code.subjects.len(), 1);

        let by_dept = fx.service.search("science").await.unwrap();
        assert_eq!(by_dept.departments.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_recent_limit() {
        let fx = fixture();
        let subject = seed(&fx.service).await;
        for i in 0..7 {
            add_paper(&fx.papers, &subject, &format!("Paper {i}"), 2020, Month::Jan).await;
        }

        let stats = fx.service.dashboard().await.unwrap();
        assert_eq!(stats.department_count, 1);
        assert_eq!(stats.subject_count, 1);
        assert_eq!(stats.paper_count, 7);
        assert_eq!(stats.recent_papers.len(), 5);
        assert_eq!(stats.recent_papers[0].paper.title, "Paper 6");
    }

    #[tokio::test]
    async fn test_tree_nests_all_levels() {
        let fx = fixture();
        seed(&fx.service).await;
        let tree = fx.service.tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        let semester = &tree[0].schemes[0].semesters[0];
        assert_eq!(semester.semester.number, 3);
        assert_eq!(semester.subjects[0].subject.name, "Database Systems");
    }
}
