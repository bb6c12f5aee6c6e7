//! Liveness and metrics endpoints.

use crate::router::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "report-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Counter snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}
