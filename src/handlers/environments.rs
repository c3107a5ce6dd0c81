use crate::handlers::{AppState, internal_error};
use crate::jobs::JobOperation;
use crate::lifecycle::{CreateRequest, StatusCheck};
use crate::naming::sanitize;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

/// `GET /environments` — every known environment, newest first. Each one is
/// reconciled independently; a failed status query degrades that entry to
/// `Unknown` without disturbing its siblings.
pub async fn list(State(state): State<AppState>) -> Response {
    let records = match state.store.list().await {
        Ok(records) => records,
        Err(e) => {
            error!("❌ Failed to list environments: {e:#}");
            return internal_error();
        }
    };

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(state.reconciler.view(record).await);
    }
    views.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));

    Json(views).into_response()
}

/// `GET /environments/{name}` — 404 only when no metadata record exists for
/// the sanitized name; an unqueryable environment still returns its record
/// with status `Unknown`.
pub async fn get(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.store.read(&name).await {
        Ok(Some(record)) => Json(state.reconciler.view(record).await).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Environment not found",
                "name": name,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("❌ Failed to read environment {name}: {e:#}");
            internal_error()
        }
    }
}

/// `POST /environments` — validates the body, then hands the slow create run
/// to the job registry and returns a polling handle immediately. The
/// rejection is captured so an unparsable body still gets a JSON 400 instead
/// of axum's plain-text default.
pub async fn create(
    State(state): State<AppState>,
    request: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Environment name is required" })),
        )
            .into_response();
    }

    let name = sanitize(&request.name);
    let coordinator = state.coordinator.clone();
    let job_id = state
        .jobs
        .submit(JobOperation::Create, &name, async move {
            coordinator.create(&request).await
        })
        .await;

    info!("📦 Queued create job {job_id} for environment {name}");
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "message": format!("Environment {name} provisioning started"),
            "name": name,
            "jobId": job_id,
        })),
    )
        .into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub force: bool,
}

/// `DELETE /environments/{name}?force=` — same job-handle shape as create.
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let name = sanitize(&name);
    let coordinator = state.coordinator.clone();
    let job_name = name.clone();
    let job_id = state
        .jobs
        .submit(JobOperation::Delete, &name, async move {
            coordinator.delete(&job_name, params.force).await
        })
        .await;

    info!("🗑️  Queued delete job {job_id} for environment {name}");
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "message": format!("Environment {name} deletion started"),
            "name": name,
            "jobId": job_id,
        })),
    )
        .into_response()
}

/// `GET /environments/{name}/status` — runs the deep check script. Never a
/// 404: an unknown or broken environment reports status `Unknown`.
pub async fn status(State(state): State<AppState>, Path(name): Path<String>) -> Json<StatusCheck> {
    Json(state.coordinator.check(&name).await)
}
