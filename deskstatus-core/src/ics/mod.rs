//! ICS feed parsing.
//!
//! Only what presence resolution needs is read from each VEVENT: start/end,
//! summary, location, description and the Outlook busy-status property.

mod parse;

pub use parse::parse_calendar;
