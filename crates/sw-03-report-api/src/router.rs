//! HTTP routes and shared handler state.

use crate::domain::config::ApiConfig;
use crate::handlers::{reports, system};
use crate::middleware::{create_cors_layer, ApiMetrics, TimeoutLayer, TracingLayer};
use crate::ports::outbound::ReportStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use sw_01_signature_verification::SignatureVerificationApi;
use tower::ServiceBuilder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub verifier: Arc<dyn SignatureVerificationApi>,
    pub config: Arc<ApiConfig>,
    pub metrics: Arc<ApiMetrics>,
}

/// Build the full router with its middleware stack.
///
/// | Route | Methods |
/// |---|---|
/// | `/api/reports` | GET, POST |
/// | `/api/reports/stats` | GET |
/// | `/api/reports/:id` | GET, PATCH, DELETE |
/// | `/api/reports/:id/vote` | POST |
/// | `/health` | GET |
/// | `/metrics` | GET |
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&state.config.cors))
        .layer(TracingLayer::new(Arc::clone(&state.metrics)))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.limits.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(state.config.limits.max_request_size));

    Router::new()
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route("/api/reports/stats", get(reports::report_stats))
        .route(
            "/api/reports/:id",
            get(reports::get_report)
                .patch(reports::update_report)
                .delete(reports::delete_report),
        )
        .route("/api/reports/:id/vote", post(reports::vote_report))
        .route("/health", get(system::health_check))
        .route("/metrics", get(system::metrics))
        .layer(middleware)
        .with_state(state)
}
