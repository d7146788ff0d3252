use axum::{extract::State, Json};
use serde_json::{json, Map, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and which providers have credentials.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let providers: Map<String, Value> = state
        .pipeline
        .orchestrator()
        .providers()
        .configured()
        .into_iter()
        .map(|(id, configured)| (id.as_str().to_string(), Value::Bool(configured)))
        .collect();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quickcv-api",
        "providers": providers
    }))
}
