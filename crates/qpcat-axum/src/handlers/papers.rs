//! Paper download handler.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::error::HttpError;
use crate::state::AppState;

/// Stream a paper's stored bytes as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, HttpError> {
    let download = state.core.papers().download(id).await?;
    let disposition = HeaderValue::from_bytes(download.content_disposition().as_bytes())
        .map_err(|e| HttpError::Internal(format!("Invalid filename header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(download.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(download.bytes),
    )
        .into_response())
}
