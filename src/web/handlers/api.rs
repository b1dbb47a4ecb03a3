//! API endpoint handlers

use crate::services::conversation::run_turn;
use crate::state::AppState;
use crate::types::{AppError, ChatRequest, ClearRequest, HistoryExport};
use axum::{
    extract::{Form, Path, State},
    response::{Html, Json},
};

/// Handle chat message submission
///
/// Returns the rendered turn: user bubble, optional error notice, assistant bubble.
pub async fn send_message(
    State(state): State<AppState>,
    Form(msg): Form<ChatRequest>,
) -> Result<Html<String>, AppError> {
    let settings = msg
        .settings(&state.config.default_settings)
        .map_err(AppError::InvalidSettings)?;

    if msg.message.trim().is_empty() {
        tracing::debug!("Ignoring empty message for session: {}", msg.session_id);
        return Ok(Html(String::new()));
    }

    tracing::info!(
        "Received message ({} chars) for session: {}",
        msg.message.len(),
        msg.session_id
    );

    let session = state.sessions.write().await.get_or_create(&msg.session_id);
    // Held for the whole turn so turns within a session never interleave
    let mut session = session.lock().await;

    let outcome = run_turn(
        &state.ml,
        &state.prompts,
        &mut session.history,
        &msg.message,
        &settings,
    )
    .await;

    let html = state
        .templates
        .render_turn(&outcome.turn, outcome.error_message().as_deref())?;
    Ok(Html(html))
}

/// Clear the session's history
pub async fn clear_history(
    State(state): State<AppState>,
    Form(req): Form<ClearRequest>,
) -> Result<Html<String>, AppError> {
    let session = state.sessions.read().await.get(&req.session_id);
    if let Some(session) = session {
        session.lock().await.history.clear();
        tracing::info!("Cleared history for session: {}", req.session_id);
    }

    Ok(Html(state.templates.render_cleared()?))
}

/// Export the session's turns as JSON
pub async fn export_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryExport>, AppError> {
    let session = state
        .sessions
        .read()
        .await
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    let turns = session.lock().await.history.turns().to_vec();
    Ok(Json(HistoryExport { session_id, turns }))
}
