//! HTTP handlers for lexicon-api.

pub mod vocabulary;

use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

/// Liveness probe with the running version and generation model.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.ingest.model_name(),
    }))
}
