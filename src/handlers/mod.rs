pub mod environments;
pub mod health;
pub mod jobs;

use crate::jobs::JobRegistry;
use crate::lifecycle::LifecycleCoordinator;
use crate::reconciler::StatusReconciler;
use crate::store::MetadataStore;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;

/// Shared server state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MetadataStore>,
    pub reconciler: Arc<StatusReconciler>,
    pub coordinator: Arc<LifecycleCoordinator>,
    pub jobs: JobRegistry,
}

impl AppState {
    pub fn new(
        store: Arc<MetadataStore>,
        reconciler: Arc<StatusReconciler>,
        coordinator: Arc<LifecycleCoordinator>,
        jobs: JobRegistry,
    ) -> Self {
        Self {
            store,
            reconciler,
            coordinator,
            jobs,
        }
    }
}

/// Generic 500 body; details stay in the logs.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}
