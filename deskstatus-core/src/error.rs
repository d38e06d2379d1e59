//! Error types for deskstatus.

use std::time::Duration;

use thiserror::Error;

/// Errors that abort a presence query or service startup.
#[derive(Error, Debug)]
pub enum DeskStatusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar fetch failed: {0}")]
    Fetch(String),

    #[error("Calendar fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("Calendar parse error: {0}")]
    Parse(String),

    #[error("Time zone error: {0}")]
    Localization(String),
}

impl DeskStatusError {
    /// Whether the failure happened while talking to the upstream feed.
    pub fn is_upstream(&self) -> bool {
        matches!(self, DeskStatusError::Fetch(_) | DeskStatusError::FetchTimeout(_))
    }
}

impl From<config::ConfigError> for DeskStatusError {
    fn from(err: config::ConfigError) -> Self {
        DeskStatusError::Config(err.to_string())
    }
}

/// Result type alias for deskstatus operations.
pub type DeskStatusResult<T> = Result<T, DeskStatusError>;
