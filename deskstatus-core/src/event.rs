//! Calendar event types as read from a feed.
//!
//! Timestamps keep the zone context they were written with; turning them into
//! instants in the reference zone is the job of [`crate::localize`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the Outlook property carrying the free/busy state of an event.
pub const BUSY_STATUS_PROPERTY: &str = "X-MICROSOFT-CDO-BUSYSTATUS";

/// A single event from the calendar feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: EventTime,
    pub end: Option<EventTime>,
    pub location: String,
    pub description: String,
    /// Uppercased value of the busy-status property, if the event has one
    pub status_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// Absolute instant (`...Z` suffix)
    DateTimeUtc(DateTime<Utc>),
    /// Wall-clock time with no zone attached
    DateTimeFloating(NaiveDateTime),
    /// Wall-clock time in the zone named by a `TZID` parameter
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    /// Whether the value carries no zone information of its own.
    pub fn is_floating(&self) -> bool {
        matches!(self, EventTime::Date(_) | EventTime::DateTimeFloating(_))
    }
}

/// Find the value of the first property named `name` (ASCII case-insensitive).
pub fn find_custom_property<'a>(
    properties: &'a [(String, String)],
    name: &str,
) -> Option<&'a str> {
    properties
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
