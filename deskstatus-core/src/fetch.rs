//! Retrieval of the raw feed text.
//!
//! Every request asks the upstream (and any proxy in between) not to serve a
//! cached copy, and the whole exchange is bounded by a timeout so a stalled
//! upstream fails the query instead of hanging it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use tokio::time::timeout;

use crate::error::{DeskStatusError, DeskStatusResult};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the feed at `url` as text.
    async fn fetch(&self, url: &str) -> DeskStatusResult<String>;
}

#[derive(Clone)]
pub struct HttpCalendarSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCalendarSource {
    pub fn new(timeout: Duration) -> DeskStatusResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeskStatusError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(HttpCalendarSource { client, timeout })
    }

    async fn fetch_uncached(&self, url: &str) -> DeskStatusResult<String> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| DeskStatusError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeskStatusError::Fetch(format!(
                "Calendar server responded with {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DeskStatusError::Fetch(e.to_string()))
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self, url: &str) -> DeskStatusResult<String> {
        tracing::debug!(url, "fetching calendar feed");

        let text = timeout(self.timeout, self.fetch_uncached(url))
            .await
            .map_err(|_| DeskStatusError::FetchTimeout(self.timeout))??;

        tracing::debug!(bytes = text.len(), "calendar feed fetched");
        Ok(text)
    }
}
