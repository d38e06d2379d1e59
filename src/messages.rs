//! In-memory store for the chat feed shown next to the presence status.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Messages in insertion order, shared by every request.
///
/// Writers take the lock exclusively, so concurrent appends and purges are
/// serialized here and callers need no coordination of their own.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: RwLock<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, content: impl Into<String>, timestamp: DateTime<Utc>) -> Message {
        let message = Message {
            content: content.into(),
            timestamp,
        };
        self.messages.write().await.push(message.clone());
        message
    }

    /// Messages stamped at or after `since`, oldest first.
    pub async fn list_since(&self, since: DateTime<Utc>) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.timestamp >= since)
            .cloned()
            .collect();

        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Drop messages strictly older than `cutoff`, returning how many went.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.timestamp >= cutoff);
        before - messages.len()
    }
}
