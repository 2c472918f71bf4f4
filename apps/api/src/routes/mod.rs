pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::preview::handlers::handle_preview;
use crate::render::handlers::handle_render;
use crate::state::AppState;
use crate::workflow::analyze::UPLOAD_BODY_LIMIT;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis
        .route(
            "/api/v1/resume/extract",
            post(handlers::handle_extract).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/job/structure", post(handlers::handle_structure_job))
        .route(
            "/api/v1/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/keywords/analyze",
            post(handlers::handle_analyze_keywords),
        )
        // Optimization
        .route("/api/v1/resume/optimize", post(handlers::handle_optimize))
        // Output
        .route("/api/v1/resume/preview", post(handle_preview))
        .route("/api/v1/resume/render", post(handle_render))
        .with_state(state)
}
