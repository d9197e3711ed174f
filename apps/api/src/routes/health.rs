use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn home_handler() -> Json<Value> {
    Json(json!({ "message": "Backend is running!" }))
}

/// GET /healthz
/// Fixed liveness body for the hosting platform's health check.
pub async fn healthz_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobmatch-api"
    }))
}
