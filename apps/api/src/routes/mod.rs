pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extract::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}
