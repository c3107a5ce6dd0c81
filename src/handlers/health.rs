use axum::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Service index served at `/`.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Sandbox Environment Manager API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "environments": {
                "list": "GET /environments",
                "get": "GET /environments/{name}",
                "create": "POST /environments",
                "delete": "DELETE /environments/{name}",
                "status": "GET /environments/{name}/status",
            },
            "jobs": "GET /jobs/{id}",
        },
    }))
}
