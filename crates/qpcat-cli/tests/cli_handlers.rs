//! Handler tests against an in-memory database and a temporary media root.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

use qpcat_cli::handlers::{admin, ingest, search, tree};
use qpcat_cli::{
    CliContext, DepartmentCommand, IngestArgs, SchemeCommand, SemesterCommand, SubjectCommand,
};
use qpcat_core::services::AppCore;
use qpcat_core::{FileStorage, Month};
use qpcat_db::TestDb;
use qpcat_storage::LocalFileStorage;

struct Fixture {
    ctx: CliContext,
    dir: TempDir,
    subject_id: i64,
}

async fn fixture() -> Fixture {
    let db = TestDb::new().await.unwrap();
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(dir.path().join("media")));
    let ctx = CliContext::new(AppCore::new(db.repos(), storage));

    let dept = admin::add_department(
        &ctx,
        DepartmentCommand::Add {
            name: "Electrical Engineering".to_string(),
            slug: Some("eee".to_string()),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let scheme = admin::add_scheme(
        &ctx,
        SchemeCommand::Add {
            department: dept.id,
            year: 2019,
            slug: None,
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let semester = admin::add_semester(
        &ctx,
        SemesterCommand::Add {
            scheme: scheme.id,
            number: 5,
            slug: None,
        },
    )
    .await
    .unwrap();
    let subject = admin::add_subject(
        &ctx,
        SubjectCommand::Add {
            semester: semester.id,
            name: "Power Systems".to_string(),
            code: "EE501".to_string(),
            slug: None,
            description: String::new(),
        },
    )
    .await
    .unwrap();

    Fixture {
        ctx,
        dir,
        subject_id: subject.id,
    }
}

fn write_zip(dir: &TempDir, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join(name);
    let mut writer = ZipWriter::new(std::fs::File::create(&path).unwrap());
    for (entry, body) in entries {
        writer.start_file(*entry, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn args(subject: i64, archive: PathBuf) -> IngestArgs {
    IngestArgs {
        subject,
        year: 2022,
        month: Month::Apr,
        archive,
    }
}

#[tokio::test]
async fn test_tree_lists_created_nodes() {
    let fx = fixture().await;
    let branches = fx.ctx.app().catalog().tree().await.unwrap();
    let lines = tree::render_tree(&branches);

    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("Electrical Engineering [eee]"));
    assert!(lines[1].ends_with("2019 [2019]"));
    assert!(lines[2].ends_with("Fifth Semester [semester-5]"));
    assert!(lines[3].ends_with("[EE501] Power Systems [power-systems] - 0 papers"));
}

#[tokio::test]
async fn test_duplicate_department_exits_with_one() {
    let fx = fixture().await;
    let err = admin::add_department(
        &fx.ctx,
        DepartmentCommand::Add {
            name: "Electrical Engineering".to_string(),
            slug: None,
            description: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);

    let err = admin::add_semester(
        &fx.ctx,
        SemesterCommand::Add {
            scheme: 1,
            number: 9,
            slug: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_ingest_reports_notices_and_redirect() {
    let fx = fixture().await;
    let archive = write_zip(
        &fx.dir,
        "april.zip",
        &[("Endsem.pdf", "%PDF-1"), ("notes.txt", "skip"), ("q/Supply.pdf", "%PDF-2")],
    );

    let report = ingest::ingest(&fx.ctx, &args(fx.subject_id, archive))
        .await
        .unwrap();
    assert_eq!(report.outcome.success_count, 2);
    assert_eq!(report.outcome.failure_count, 0);

    let lines = ingest::render_report(&report);
    assert_eq!(
        lines,
        vec![
            "[ok] Successfully uploaded 2 question papers to Power Systems".to_string(),
            "View: /eee/2019/semester-5/power-systems/".to_string(),
        ]
    );
    assert!(
        fx.dir
            .path()
            .join("media/eee/2019/semester-5/power-systems/Endsem.pdf")
            .is_file()
    );

    let results = fx.ctx.app().catalog().search("supply").await.unwrap();
    let lines = search::render_results(&results);
    assert_eq!(lines[0], "Papers (1)");
    assert!(lines[1].contains("[EE501] Supply - Power Systems (April 2022)"));
}

#[tokio::test]
async fn test_ingest_rejections_map_to_exit_codes() {
    let fx = fixture().await;

    let no_pdfs = write_zip(&fx.dir, "empty.zip", &[("readme.txt", "x")]);
    let err = ingest::ingest(&fx.ctx, &args(fx.subject_id, no_pdfs))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_string(), "ZIP file does not contain any PDF files.");

    let valid = write_zip(&fx.dir, "ok.zip", &[("a.pdf", "%PDF")]);
    let err = ingest::ingest(&fx.ctx, &args(fx.subject_id + 100, valid))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);

    let missing = fx.dir.path().join("nowhere.zip");
    let err = ingest::ingest(&fx.ctx, &args(fx.subject_id, missing))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 74);

    let results = fx.ctx.app().catalog().search("a").await.unwrap();
    assert!(results.papers.is_empty());
}
