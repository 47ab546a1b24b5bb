//! In-memory fakes and fixtures shared by unit tests.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::domain::{
    CatalogPath, Department, DepartmentSummary, FileRef, NewDepartment, NewQuestionPaper,
    NewScheme, NewSemester, NewSubject, PaperFilter, PaperHit, PathSegment, QuestionPaper,
    ResolvedSubject, Scheme, Semester, Subject, SubjectSummary,
};
use crate::ports::{
    CatalogRepository, FileStorage, QuestionPaperRepository, RepositoryError, StorageError,
    StoragePath,
};

// ─────────────────────────────────────────────────────────────────────────────
// ZIP fixtures
// ─────────────────────────────────────────────────────────────────────────────

pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    build_zip_with_dirs(&[], entries)
}

/// Stored (uncompressed) entries, so payload bytes appear verbatim.
pub fn build_zip_with_dirs(dirs: &[&str], entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for dir in dirs {
        writer.add_directory(*dir, options).unwrap();
    }
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Flip one byte of `payload` inside the archive so its checksum no longer matches.
pub fn corrupt_entry(blob: &mut [u8], payload: &str) {
    let needle = payload.as_bytes();
    let pos = blob
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("payload present in archive");
    blob[pos] ^= 0xFF;
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog fixtures
// ─────────────────────────────────────────────────────────────────────────────

fn segment(id: i64, label: &str, slug: &str) -> PathSegment {
    PathSegment {
        id,
        label: label.to_string(),
        slug: slug.to_string(),
    }
}

/// `cse / 2021 / semester-3 / operating-systems`, subject id 7, code `CS301`.
pub fn resolved_subject() -> ResolvedSubject {
    let now = Utc::now();
    ResolvedSubject {
        subject: Subject {
            id: 7,
            semester_id: 3,
            name: "Operating Systems".to_string(),
            subject_code: "CS301".to_string(),
            slug: "operating-systems".to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        },
        path: CatalogPath {
            department: segment(1, "Computer Science", "cse"),
            scheme: segment(2, "2021", "2021"),
            semester: segment(3, "Third Semester", "semester-3"),
            subject: segment(7, "[CS301] Operating Systems", "operating-systems"),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStorage
// ─────────────────────────────────────────────────────────────────────────────

/// Map-backed storage that renames on collision, like the real backends.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn put(&self, key: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn write(&self, path: &StoragePath, bytes: &[u8]) -> Result<FileRef, StorageError> {
        let mut files = self.files.lock().unwrap();
        let mut key = path.key();
        let mut n = 1;
        while files.contains_key(&key) {
            key = path.with_filename(format!("{}_{n}", path.filename())).key();
            n += 1;
        }
        files.insert(key.clone(), bytes.to_vec());
        Ok(FileRef::new(key))
    }

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, StorageError> {
        self.get(file.as_str())
            .ok_or_else(|| StorageError::NotFound(file.to_string()))
    }

    async fn delete(&self, file: &FileRef) -> Result<(), StorageError> {
        self.files
            .lock()
            .unwrap()
            .remove(file.as_str())
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(file.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryPapers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryPapers {
    rows: Mutex<Vec<QuestionPaper>>,
    rejected_titles: Mutex<Vec<String>>,
    subject_names: Mutex<BTreeMap<i64, String>>,
}

impl MemoryPapers {
    pub fn all(&self) -> Vec<QuestionPaper> {
        self.rows.lock().unwrap().clone()
    }

    /// Make inserts of papers titled `title` fail.
    pub fn reject_title(&self, title: &str) {
        self.rejected_titles.lock().unwrap().push(title.to_string());
    }

    pub fn name_subject(&self, id: i64, name: &str) {
        self.subject_names
            .lock()
            .unwrap()
            .insert(id, name.to_string());
    }

    fn hit(&self, paper: QuestionPaper) -> PaperHit {
        let subject_name = self
            .subject_names
            .lock()
            .unwrap()
            .get(&paper.subject_id)
            .cloned()
            .unwrap_or_default();
        PaperHit {
            paper,
            subject_name,
        }
    }
}

#[async_trait]
impl QuestionPaperRepository for MemoryPapers {
    async fn insert(&self, paper: &NewQuestionPaper) -> Result<QuestionPaper, RepositoryError> {
        if self.rejected_titles.lock().unwrap().contains(&paper.title) {
            return Err(RepositoryError::Storage("database is locked".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = i64::try_from(rows.len()).unwrap() + 1;
        // Strictly increasing upload times keep "newest first" deterministic.
        let uploaded = Utc::now() + Duration::seconds(id);
        let stored = QuestionPaper {
            id,
            title: paper.title.clone(),
            subject_id: paper.subject_id,
            subject_code: paper.subject_code.clone(),
            year: paper.year,
            month: paper.month,
            file: paper.file.clone(),
            description: paper.description.clone(),
            upload_date: uploaded,
            updated_at: uploaded,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: i64) -> Result<QuestionPaper, RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("question paper {id}")))
    }

    async fn list_for_subject(
        &self,
        subject_id: i64,
        filter: &PaperFilter,
    ) -> Result<Vec<QuestionPaper>, RepositoryError> {
        let mut list: Vec<QuestionPaper> = self
            .all()
            .into_iter()
            .filter(|p| p.subject_id == subject_id)
            .filter(|p| filter.year.is_none_or(|y| p.year == y))
            .filter(|p| filter.month.is_none_or(|m| p.month == m))
            .collect();
        list.sort_by(|a, b| b.year.cmp(&a.year).then(b.upload_date.cmp(&a.upload_date)));
        Ok(list)
    }

    async fn years_for_subject(&self, subject_id: i64) -> Result<Vec<i32>, RepositoryError> {
        let mut years: Vec<i32> = self
            .all()
            .into_iter()
            .filter(|p| p.subject_id == subject_id)
            .map(|p| p.year)
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    async fn search(&self, query: &str) -> Result<Vec<PaperHit>, RepositoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .all()
            .into_iter()
            .map(|p| self.hit(p))
            .filter(|h| {
                [
                    &h.paper.title,
                    &h.paper.subject_code,
                    &h.paper.description,
                    &h.subject_name,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<PaperHit>, RepositoryError> {
        let mut all = self.all();
        all.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(all
            .into_iter()
            .take(usize::try_from(limit).unwrap())
            .map(|p| self.hit(p))
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(i64::try_from(self.rows.lock().unwrap().len()).unwrap())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryCatalog
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CatalogRows {
    departments: Vec<Department>,
    schemes: Vec<Scheme>,
    semesters: Vec<Semester>,
    subjects: Vec<Subject>,
}

/// Vec-backed catalog that enforces the sibling uniqueness rules.
#[derive(Default)]
pub struct MemoryCatalog {
    rows: Mutex<CatalogRows>,
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).unwrap() + 1
}

fn not_found(what: &str, key: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::NotFound(format!("{what} {key}"))
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn insert_department(&self, new: &NewDepartment) -> Result<Department, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let slug = new.effective_slug();
        if rows
            .departments
            .iter()
            .any(|d| d.name == new.name || d.slug == slug)
        {
            return Err(RepositoryError::AlreadyExists(new.name.clone()));
        }
        let now = Utc::now();
        let dept = Department {
            id: next_id(rows.departments.len()),
            name: new.name.clone(),
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.departments.push(dept.clone());
        Ok(dept)
    }

    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut list: Vec<DepartmentSummary> = rows
            .departments
            .iter()
            .map(|d| {
                let count = rows
                    .subjects
                    .iter()
                    .filter(|s| {
                        rows.semesters
                            .iter()
                            .find(|sem| sem.id == s.semester_id)
                            .and_then(|sem| rows.schemes.iter().find(|sc| sc.id == sem.scheme_id))
                            .is_some_and(|sc| sc.department_id == d.id)
                    })
                    .count();
                DepartmentSummary {
                    department: d.clone(),
                    subject_count: i64::try_from(count).unwrap(),
                }
            })
            .collect();
        list.sort_by(|a, b| a.department.name.cmp(&b.department.name));
        Ok(list)
    }

    async fn get_department(&self, id: i64) -> Result<Department, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.departments
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| not_found("department", id))
    }

    async fn get_department_by_slug(&self, slug: &str) -> Result<Department, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.departments
            .iter()
            .find(|d| d.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("department", slug))
    }

    async fn insert_scheme(&self, new: &NewScheme) -> Result<Scheme, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.departments.iter().any(|d| d.id == new.department_id) {
            return Err(RepositoryError::Constraint("unknown department".to_string()));
        }
        let slug = new.effective_slug();
        if rows
            .schemes
            .iter()
            .any(|s| s.department_id == new.department_id && (s.year == new.year || s.slug == slug))
        {
            return Err(RepositoryError::AlreadyExists(format!("scheme {}", new.year)));
        }
        let now = Utc::now();
        let scheme = Scheme {
            id: next_id(rows.schemes.len()),
            department_id: new.department_id,
            year: new.year,
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.schemes.push(scheme.clone());
        Ok(scheme)
    }

    async fn list_schemes(&self, department_id: i64) -> Result<Vec<Scheme>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut list: Vec<Scheme> = rows
            .schemes
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(list)
    }

    async fn get_scheme(&self, id: i64) -> Result<Scheme, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.schemes
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found("scheme", id))
    }

    async fn get_scheme_by_slug(
        &self,
        department_id: i64,
        slug: &str,
    ) -> Result<Scheme, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.schemes
            .iter()
            .find(|s| s.department_id == department_id && s.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("scheme", slug))
    }

    async fn insert_semester(&self, new: &NewSemester) -> Result<Semester, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.schemes.iter().any(|s| s.id == new.scheme_id) {
            return Err(RepositoryError::Constraint("unknown scheme".to_string()));
        }
        let slug = new.effective_slug();
        if rows
            .semesters
            .iter()
            .any(|s| s.scheme_id == new.scheme_id && (s.number == new.number || s.slug == slug))
        {
            return Err(RepositoryError::AlreadyExists(format!("semester {}", new.number)));
        }
        let now = Utc::now();
        let semester = Semester {
            id: next_id(rows.semesters.len()),
            scheme_id: new.scheme_id,
            number: new.number,
            slug,
            created_at: now,
            updated_at: now,
        };
        rows.semesters.push(semester.clone());
        Ok(semester)
    }

    async fn list_semesters(&self, scheme_id: i64) -> Result<Vec<Semester>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut list: Vec<Semester> = rows
            .semesters
            .iter()
            .filter(|s| s.scheme_id == scheme_id)
            .cloned()
            .collect();
        list.sort_by_key(|s| s.number);
        Ok(list)
    }

    async fn get_semester(&self, id: i64) -> Result<Semester, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.semesters
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found("semester", id))
    }

    async fn get_semester_by_slug(
        &self,
        scheme_id: i64,
        slug: &str,
    ) -> Result<Semester, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.semesters
            .iter()
            .find(|s| s.scheme_id == scheme_id && s.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("semester", slug))
    }

    async fn insert_subject(&self, new: &NewSubject) -> Result<Subject, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.semesters.iter().any(|s| s.id == new.semester_id) {
            return Err(RepositoryError::Constraint("unknown semester".to_string()));
        }
        let slug = new.effective_slug();
        if rows
            .subjects
            .iter()
            .any(|s| s.semester_id == new.semester_id && (s.name == new.name || s.slug == slug))
        {
            return Err(RepositoryError::AlreadyExists(new.name.clone()));
        }
        let now = Utc::now();
        let subject = Subject {
            id: next_id(rows.subjects.len()),
            semester_id: new.semester_id,
            name: new.name.clone(),
            subject_code: new.subject_code.clone(),
            slug,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn list_subjects(
        &self,
        semester_id: i64,
    ) -> Result<Vec<SubjectSummary>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut list: Vec<SubjectSummary> = rows
            .subjects
            .iter()
            .filter(|s| s.semester_id == semester_id)
            .map(|s| SubjectSummary {
                subject: s.clone(),
                paper_count: 0,
            })
            .collect();
        list.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));
        Ok(list)
    }

    async fn get_subject(&self, id: i64) -> Result<Subject, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.subjects
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found("subject", id))
    }

    async fn get_subject_by_slug(
        &self,
        semester_id: i64,
        slug: &str,
    ) -> Result<Subject, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        rows.subjects
            .iter()
            .find(|s| s.semester_id == semester_id && s.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("subject", slug))
    }

    async fn resolve_subject(&self, subject_id: i64) -> Result<ResolvedSubject, RepositoryError> {
        let subject = self.get_subject(subject_id).await?;
        let semester = self.get_semester(subject.semester_id).await?;
        let scheme = self.get_scheme(semester.scheme_id).await?;
        let department = self.get_department(scheme.department_id).await?;
        Ok(ResolvedSubject {
            path: CatalogPath {
                department: segment(department.id, &department.name, &department.slug),
                scheme: segment(scheme.id, &scheme.label(), &scheme.slug),
                semester: segment(semester.id, &semester.label(), &semester.slug),
                subject: segment(subject.id, &subject.label(), &subject.slug),
            },
            subject,
        })
    }

    async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, RepositoryError> {
        let needle = query.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .subjects
            .iter()
            .filter(|s| {
                [&s.name, &s.subject_code, &s.description]
                    .iter()
                    .any(|f| f.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn search_departments(&self, query: &str) -> Result<Vec<Department>, RepositoryError> {
        let needle = query.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .departments
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&needle)
                    || d.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn count_departments(&self) -> Result<i64, RepositoryError> {
        Ok(i64::try_from(self.rows.lock().unwrap().departments.len()).unwrap())
    }

    async fn count_subjects(&self) -> Result<i64, RepositoryError> {
        Ok(i64::try_from(self.rows.lock().unwrap().subjects.len()).unwrap())
    }
}
