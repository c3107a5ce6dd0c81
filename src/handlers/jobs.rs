use crate::handlers::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// `GET /jobs/{id}` — poll a create/delete job. Unknown and malformed ids
/// both read as not found.
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Ok(job_id) = Uuid::parse_str(&id) {
        if let Some(job) = state.jobs.get(job_id).await {
            return Json(job).into_response();
        }
    }

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Job not found",
            "jobId": id,
        })),
    )
        .into_response()
}
