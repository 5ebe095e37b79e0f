use axum::{extract::State, http::StatusCode, Json};

use crate::session::SessionSummary;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn session_handler(State(state): State<AppState>) -> Json<SessionSummary> {
    Json(state.session.read().await.summary())
}

/// DELETE /api/v1/session
///
/// Clears wizard data. The outreach history is kept.
pub async fn clear_session_handler(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.clear();
    tracing::info!("Wizard session cleared");
    StatusCode::NO_CONTENT
}
