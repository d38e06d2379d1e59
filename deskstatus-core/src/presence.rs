//! Presence query: feed text in, today's events and aggregate status out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::DeskStatusResult;
use crate::fetch::CalendarSource;
use crate::ics::parse_calendar;
use crate::localize::{LocalizedEvent, localize_event};
use crate::status::{PresenceStatus, StatusResolver};
use crate::today::{TodayWindow, filter_today};
use crate::zones::normalize_zones;

const TIME_LABEL_FORMAT: &str = "%H:%M";

/// One event as shown in today's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayEvent {
    pub title: String,
    /// `HH:MM` in the reference zone
    pub start: String,
    /// `HH:MM` in the reference zone, empty when the event has no end
    pub end: String,
    pub location: String,
    pub description: String,
}

impl From<LocalizedEvent> for TodayEvent {
    fn from(event: LocalizedEvent) -> Self {
        TodayEvent {
            title: event.title,
            start: event.start.format(TIME_LABEL_FORMAT).to_string(),
            end: event
                .end
                .map(|end| end.format(TIME_LABEL_FORMAT).to_string())
                .unwrap_or_default(),
            location: event.location,
            description: event.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceResult {
    pub status: PresenceStatus,
    pub events: Vec<TodayEvent>,
}

/// Resolve presence from raw feed text as of `now`.
pub fn compute_presence(
    raw: &str,
    now: DateTime<Utc>,
    zone: Tz,
) -> DeskStatusResult<PresenceResult> {
    let normalized = normalize_zones(raw);
    let parsed = parse_calendar(&normalized)?;

    let now = now.with_timezone(&zone);
    let window = TodayWindow::containing(&now)?;

    let localized = parsed
        .into_iter()
        .map(|event| localize_event(event, zone))
        .collect::<DeskStatusResult<Vec<_>>>()?;

    let mut resolver = StatusResolver::new(now);
    let events: Vec<TodayEvent> = filter_today(localized, &now, &window)
        .into_iter()
        .inspect(|event| resolver.observe(event))
        .map(TodayEvent::from)
        .collect();

    Ok(PresenceResult {
        status: resolver.status(),
        events,
    })
}

/// Fetches a feed and resolves presence from it.
#[derive(Clone)]
pub struct PresenceQuery {
    source: Arc<dyn CalendarSource>,
    clock: Arc<dyn Clock>,
    url: String,
    zone: Tz,
}

impl PresenceQuery {
    pub fn new(
        source: Arc<dyn CalendarSource>,
        clock: Arc<dyn Clock>,
        url: impl Into<String>,
        zone: Tz,
    ) -> Self {
        PresenceQuery {
            source,
            clock,
            url: url.into(),
            zone,
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub async fn run(&self) -> DeskStatusResult<PresenceResult> {
        let raw = self.source.fetch(&self.url).await.inspect_err(|e| {
            tracing::warn!(error = %e, "calendar fetch failed");
        })?;

        let result = compute_presence(&raw, self.clock.now(), self.zone).inspect_err(|e| {
            tracing::warn!(error = %e, "could not resolve presence from feed");
        })?;

        tracing::debug!(
            status = %result.status,
            events = result.events.len(),
            "presence resolved"
        );
        Ok(result)
    }
}
