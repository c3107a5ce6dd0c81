use crate::handlers::{AppState, environments, health, jobs};
use axum::Json;
use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;

/// Build the full application router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route(
            "/environments",
            get(environments::list).post(environments::create),
        )
        .route(
            "/environments/:name",
            get(environments::get).delete(environments::delete),
        )
        .route("/environments/:name/status", get(environments::status))
        .route("/jobs/:id", get(jobs::get))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "path": uri.path(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}
