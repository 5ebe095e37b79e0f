use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::llm_client::AVAILABLE_MODELS;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "outreach-api"
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub temperature: f32,
    pub available: Vec<ModelOption>,
}

/// GET /api/v1/model
pub async fn model_handler(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(ModelInfo {
        model: state.llm.model().to_string(),
        temperature: state.config.llm_temperature,
        available: AVAILABLE_MODELS
            .iter()
            .map(|&(id, description)| ModelOption { id, description })
            .collect(),
    })
}
