//! Bulk upload handler.
//!
//! Multipart fields: `subject`, `year`, `month`, `zip_file`. The cascading
//! `department`/`scheme`/`semester` selections may be sent too; the subject
//! alone decides where papers go, so they are ignored.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartError;
use serde::Serialize;
use tracing::info;

use crate::error::HttpError;
use crate::state::AppState;
use qpcat_core::services::BulkUploadReport;
use qpcat_core::{BulkUploadRequest, Month, Notice};

/// Summary returned after an accepted upload, partial failures included.
#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub messages: Vec<String>,
    pub notices: Vec<Notice>,
    /// Front-end subject page to show next.
    pub redirect: String,
    /// The same subject page on this API.
    pub catalog_url: String,
}

impl From<BulkUploadReport> for BulkUploadResponse {
    fn from(report: BulkUploadReport) -> Self {
        Self {
            success_count: report.outcome.success_count,
            failure_count: report.outcome.failure_count,
            messages: report.outcome.messages,
            notices: report.notices,
            redirect: report.redirect,
            catalog_url: format!("/api/catalog/{}", report.subject.path.slugs().join("/")),
        }
    }
}

#[derive(Default)]
struct UploadForm {
    subject: Option<String>,
    year: Option<String>,
    month: Option<String>,
    zip_file: Option<(String, Vec<u8>)>,
}

fn multipart_error(e: &MultipartError) -> HttpError {
    HttpError::BadRequest(format!("Malformed upload: {}", e.body_text()))
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, HttpError> {
    value.ok_or_else(|| HttpError::BadRequest(format!("{field}: This field is required.")))
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, HttpError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(&e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "subject" | "year" | "month" => {
                    let text = field.text().await.map_err(|e| multipart_error(&e))?;
                    let text = text.trim().to_string();
                    let slot = match name.as_str() {
                        "subject" => &mut form.subject,
                        "year" => &mut form.year,
                        _ => &mut form.month,
                    };
                    *slot = Some(text).filter(|t| !t.is_empty());
                }
                "zip_file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
                    if !bytes.is_empty() {
                        form.zip_file = Some((filename, bytes.to_vec()));
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn into_request(self) -> Result<BulkUploadRequest, HttpError> {
        let subject = required("subject", self.subject)?;
        let subject_id = subject.parse::<i64>().map_err(|_| {
            HttpError::BadRequest(format!(
                "subject: Select a valid choice. {subject} is not one of the available choices."
            ))
        })?;
        let year = required("year", self.year)?
            .parse::<i32>()
            .map_err(|_| HttpError::BadRequest("year: Enter a whole number.".to_string()))?;
        let month_raw = required("month", self.month)?;
        let month = Month::from_str(&month_raw).map_err(|_| {
            HttpError::BadRequest(format!(
                "month: Select a valid choice. {month_raw} is not one of the available choices."
            ))
        })?;
        let (filename, archive) = required("zip_file", self.zip_file)?;

        Ok(BulkUploadRequest {
            subject_id,
            year,
            month,
            filename,
            archive,
        })
    }
}

/// Validate the form and archive, then ingest every PDF in it.
pub async fn bulk_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BulkUploadResponse>, HttpError> {
    let request = UploadForm::read(multipart).await?.into_request()?;
    let report = state.core.bulk_upload().upload(&request).await?;
    info!(
        target: "qpcat.ingest",
        subject_id = request.subject_id,
        success = report.outcome.success_count,
        failed = report.outcome.failure_count,
        "Bulk upload finished"
    );
    Ok(Json(report.into()))
}
