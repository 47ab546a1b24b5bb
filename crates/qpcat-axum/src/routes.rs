//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// All API routes without the `/api` prefix.
pub(crate) fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Home, dashboard, search
        .route("/departments", get(handlers::catalog::departments))
        .route("/dashboard", get(handlers::search::dashboard))
        .route("/search", get(handlers::search::search))
        // Cascading lookups for the upload form
        .route("/lookup/schemes", get(handlers::lookup::schemes))
        .route("/lookup/semesters", get(handlers::lookup::semesters))
        .route("/lookup/subjects", get(handlers::lookup::subjects))
        // Bulk upload
        .route(
            "/bulk-upload",
            post(handlers::upload::bulk_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Papers
        .route("/papers/{id}/download", get(handlers::papers::download))
        // Browsing by slug chain
        .route("/catalog/{dept}", get(handlers::catalog::department))
        .route("/catalog/{dept}/{scheme}", get(handlers::catalog::scheme))
        .route(
            "/catalog/{dept}/{scheme}/{semester}",
            get(handlers::catalog::semester),
        )
        .route(
            "/catalog/{dept}/{scheme}/{semester}/{subject}",
            get(handlers::catalog::subject),
        )
}

/// Create the main Axum router with all API routes.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let max_upload_bytes = ctx.max_upload_bytes;
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            api_routes(max_upload_bytes).with_state(state).layer(cors),
        )
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
