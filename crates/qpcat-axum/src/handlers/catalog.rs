//! Catalog browsing handlers, resolved by slug chain.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;
use qpcat_core::services::{DepartmentPage, SchemePage, SemesterPage, SubjectPage};
use qpcat_core::{DepartmentSummary, Month, PaperFilter};

/// Home listing: departments with their subject counts.
pub async fn departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentSummary>>, HttpError> {
    Ok(Json(state.core.catalog().departments().await?))
}

pub async fn department(
    State(state): State<AppState>,
    Path(dept): Path<String>,
) -> Result<Json<DepartmentPage>, HttpError> {
    Ok(Json(state.core.catalog().department_page(&dept).await?))
}

pub async fn scheme(
    State(state): State<AppState>,
    Path((dept, scheme)): Path<(String, String)>,
) -> Result<Json<SchemePage>, HttpError> {
    Ok(Json(state.core.catalog().scheme_page(&dept, &scheme).await?))
}

pub async fn semester(
    State(state): State<AppState>,
    Path((dept, scheme, semester)): Path<(String, String, String)>,
) -> Result<Json<SemesterPage>, HttpError> {
    Ok(Json(
        state
            .core
            .catalog()
            .semester_page(&dept, &scheme, &semester)
            .await?,
    ))
}

/// `?year=&month=`; empty values mean no filter.
#[derive(Debug, Default, Deserialize)]
pub struct SubjectQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl SubjectQuery {
    fn into_filter(self) -> Result<PaperFilter, HttpError> {
        let year = match self.year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| HttpError::BadRequest(format!("year: Enter a whole number. Got '{raw}'")))?,
            ),
        };
        let month = match self.month.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Month::from_str(raw).map_err(|e| HttpError::BadRequest(format!("month: {e}")))?,
            ),
        };
        Ok(PaperFilter { year, month })
    }
}

pub async fn subject(
    State(state): State<AppState>,
    Path((dept, scheme, semester, subject)): Path<(String, String, String, String)>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<SubjectPage>, HttpError> {
    let filter = query.into_filter()?;
    Ok(Json(
        state
            .core
            .catalog()
            .subject_page(
                [dept.as_str(), scheme.as_str(), semester.as_str(), subject.as_str()],
                filter,
            )
            .await?,
    ))
}
