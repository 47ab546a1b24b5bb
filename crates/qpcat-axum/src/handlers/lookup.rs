//! Cascading lookups for the upload form: department → scheme → semester → subject.
//!
//! A missing parent id yields an empty list, matching an unselected dropdown.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;
use qpcat_core::ChildOption;

#[derive(Debug, Deserialize)]
pub struct SchemeQuery {
    pub department: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SemesterQuery {
    pub scheme: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectQuery {
    pub semester: Option<i64>,
}

pub async fn schemes(
    State(state): State<AppState>,
    Query(query): Query<SchemeQuery>,
) -> Result<Json<Vec<ChildOption>>, HttpError> {
    let Some(department) = query.department else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.core.catalog().scheme_options(department).await?))
}

pub async fn semesters(
    State(state): State<AppState>,
    Query(query): Query<SemesterQuery>,
) -> Result<Json<Vec<ChildOption>>, HttpError> {
    let Some(scheme) = query.scheme else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.core.catalog().semester_options(scheme).await?))
}

pub async fn subjects(
    State(state): State<AppState>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<Vec<ChildOption>>, HttpError> {
    let Some(semester) = query.semester else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.core.catalog().subject_options(semester).await?))
}
