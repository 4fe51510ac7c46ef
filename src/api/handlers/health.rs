use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Agent pipeline service. Agents live under /api/agents"
    }))
}
