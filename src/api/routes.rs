//! HTTP API route definitions.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, home, metadata, metrics, predict, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Form page
        .route("/", get(home))
        // Prediction endpoint
        .route("/predict", post(predict))
        // Introspection endpoints
        .route("/health", get(health))
        .route("/metadata", get(metadata))
        .route("/metrics", get(metrics))
        .with_state(state)
}
