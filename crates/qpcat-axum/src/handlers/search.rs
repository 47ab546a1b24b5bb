//! Search and dashboard handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;
use qpcat_core::services::{DashboardStats, SearchResults};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, HttpError> {
    Ok(Json(state.core.catalog().search(&query.q).await?))
}

/// Counts plus the most recent uploads.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, HttpError> {
    Ok(Json(state.core.catalog().dashboard().await?))
}
