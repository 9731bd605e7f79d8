use axum::{extract::State, Json};
use serde_json::json;

use crate::state::AppState;

/// Health check con backend y revisión publicada
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "backend": state.store.backend(),
        "revision": state.feed.revision(),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
