use crate::services::SessionManager;
use crate::state::AppState;
use crate::types::{AppError, PageQuery};
use axum::{
    extract::{Query, State},
    response::Html,
};

/// Chat page. A known `session_id` re-renders that session, anything else
/// gets a fresh id that is only stored once a message is sent.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let known = match query.session_id.as_deref() {
        Some(id) => state.sessions.read().await.get(id),
        None => None,
    };

    let html = match known {
        Some(handle) => {
            let session = handle.lock().await;
            state.templates.render_page(
                &session.id,
                session.history.turns(),
                &state.config.default_settings,
            )?
        }
        None => state.templates.render_page(
            &SessionManager::new_id(),
            &[],
            &state.config.default_settings,
        )?,
    };

    Ok(Html(html))
}
