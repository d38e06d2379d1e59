//! Presence endpoint

use axum::{extract::State, routing::get, Json, Router};
use deskstatus_core::PresenceResult;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(get_events))
}

/// GET /events - Current status and today's remaining events
async fn get_events(State(state): State<AppState>) -> Result<Json<PresenceResult>, AppError> {
    let result = state.presence.run().await?;
    Ok(Json(result))
}
