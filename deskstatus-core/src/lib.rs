//! Presence resolution from a remote ICS calendar feed.
//!
//! The pipeline, leaves first:
//! - [`zones`] rewrites vendor zone names in the raw text to IANA identifiers
//! - [`ics`] parses the text into [`CalendarEvent`]s
//! - [`localize`] expresses every event time in the reference zone
//! - [`today`] keeps the events that overlap today and have not ended
//! - [`status`] picks the highest-priority status among active events
//! - [`presence`] ties the steps together behind one query

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod ics;
pub mod localize;
pub mod presence;
pub mod status;
pub mod today;
pub mod zones;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DeskStatusConfig;
pub use error::{DeskStatusError, DeskStatusResult};
pub use event::{CalendarEvent, EventTime};
pub use fetch::{CalendarSource, HttpCalendarSource};
pub use presence::{PresenceQuery, PresenceResult, TodayEvent, compute_presence};
pub use status::PresenceStatus;
