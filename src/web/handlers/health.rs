//! Health check endpoint

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "basic-chatbot",
            "version": env!("CARGO_PKG_VERSION"),
            "model_loaded": state.ml.is_loaded(),
            "stub_mode": state.config.stub_mode,
            "sessions": state.sessions.read().await.count(),
        }))
    )
}
