//! Ingest command handler.
//!
//! Reads a ZIP archive from disk and runs it through the same bulk upload
//! service as `POST /api/bulk-upload`.

use qpcat_core::services::BulkUploadReport;
use qpcat_core::BulkUploadRequest;
use tracing::info;

use crate::bootstrap::CliContext;
use crate::commands::IngestArgs;
use crate::error::CliError;
use crate::presentation::notice_prefix;

/// Read the archive and ingest it. Partial failures still return a report.
pub async fn ingest(ctx: &CliContext, args: &IngestArgs) -> Result<BulkUploadReport, CliError> {
    let archive = tokio::fs::read(&args.archive)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", args.archive.display())))?;
    let filename = args
        .archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let request = BulkUploadRequest {
        subject_id: args.subject,
        year: args.year,
        month: args.month,
        filename,
        archive,
    };
    let report = ctx.app().bulk_upload().upload(&request).await?;
    info!(
        target: "qpcat.ingest",
        subject_id = args.subject,
        success = report.outcome.success_count,
        failed = report.outcome.failure_count,
        "Archive ingested"
    );
    Ok(report)
}

/// Notices in order, then the page to open next.
pub fn render_report(report: &BulkUploadReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .notices
        .iter()
        .map(|notice| format!("{} {}", notice_prefix(notice.level), notice.text))
        .collect();
    lines.push(format!("View: {}", report.redirect));
    lines
}

pub async fn execute(ctx: &CliContext, args: &IngestArgs) -> Result<(), CliError> {
    let report = ingest(ctx, args).await?;
    for line in render_report(&report) {
        println!("{line}");
    }
    Ok(())
}
