//! Chat feed endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use deskstatus_core::today::TodayWindow;
use serde::{Deserialize, Serialize};

use crate::messages::Message;
use crate::routes::AppError;
use crate::state::AppState;

const TIMESTAMP_FORMAT: &str = "%H:%M %d.%m.%Y";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", get(list_messages))
        .route("/messages", post(create_message))
}

/// Chat message as returned by the API
#[derive(Serialize)]
pub struct ChatMessage {
    pub content: String,
    /// `HH:MM DD.MM.YYYY` in the reference zone
    pub timestamp: String,
}

impl ChatMessage {
    fn from_message(message: Message, state: &AppState) -> Self {
        ChatMessage {
            content: message.content,
            timestamp: message
                .timestamp
                .with_timezone(&state.zone)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
        }
    }
}

/// GET /chat - Purge expired messages, then list today's
async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let now = state.clock.now();
    purge_expired(&state, now).await;

    let today = TodayWindow::containing(&now.with_timezone(&state.zone))?;
    let since: DateTime<Utc> = today.start.with_timezone(&Utc);

    let messages = state
        .messages
        .list_since(since)
        .await
        .into_iter()
        .map(|message| ChatMessage::from_message(message, &state))
        .collect();

    Ok(Json(messages))
}

/// Drop messages that have outlived the retention period.
async fn purge_expired(state: &AppState, now: DateTime<Utc>) {
    let Some(cutoff) = now.checked_sub_signed(state.retention) else {
        return;
    };

    let purged = state.messages.delete_older_than(cutoff).await;
    if purged > 0 {
        tracing::debug!(purged, "expired chat messages removed");
    }
}

/// Request body for posting a message
#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// POST /messages - Add a message to the chat feed
async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    authorize(&state, &headers)?;
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("Message content must not be empty".into()));
    }

    let now = state.clock.now();
    purge_expired(&state, now).await;

    let message = state.messages.append(content, now).await;
    tracing::info!(length = content.len(), "chat message posted");

    Ok((StatusCode::CREATED, Json(ChatMessage::from_message(message, &state))))
}

/// Check the bearer token when one is configured.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
