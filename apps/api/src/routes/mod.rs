pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        .route("/healthz", get(health::healthz_handler))
        // Match API
        .route("/process", post(handlers::handle_match))
        .route("/api/v1/match", post(handlers::handle_match))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
