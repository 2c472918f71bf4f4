use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and upstream settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careerlab-api",
        "backend_url": state.config.backend_url,
        "llm": {
            "configured": state.llm.is_configured(),
            "model": state.llm.model(),
        }
    }))
}
