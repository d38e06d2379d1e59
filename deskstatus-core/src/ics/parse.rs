//! Feed parsing using the icalendar crate's parser.

use crate::error::{DeskStatusError, DeskStatusResult};
use crate::event::{BUSY_STATUS_PROPERTY, CalendarEvent, EventTime, find_custom_property};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

/// Parse a whole feed into its events, in document order.
///
/// Any malformed timestamp or a document that is not a calendar fails the
/// whole parse; no partial list is returned.
pub fn parse_calendar(content: &str) -> DeskStatusResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);

    if !unfolded
        .trim_start()
        .get(..15)
        .is_some_and(|head| head.eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(DeskStatusError::Parse(
            "Document does not start with BEGIN:VCALENDAR".into(),
        ));
    }

    let calendar = read_calendar(&unfolded).map_err(|e| DeskStatusError::Parse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name.as_ref().eq_ignore_ascii_case("VEVENT"))
        .map(parse_vevent)
        .collect()
}

fn parse_vevent(vevent: &Component) -> DeskStatusResult<CalendarEvent> {
    let title = text_prop(vevent, "SUMMARY");

    let start = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| {
            DeskStatusError::Parse(format!("Event '{}' has no DTSTART", title))
        })
        .and_then(parse_time_prop)?;

    let end = vevent.find_prop("DTEND").map(parse_time_prop).transpose()?;

    // X- properties as (name, value) pairs; the busy status is one of them
    let custom_properties: Vec<(String, String)> = vevent
        .properties
        .iter()
        .filter(|p| {
            p.name
                .as_ref()
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("X-"))
        })
        .map(|p| (p.name.to_string(), p.val.to_string()))
        .collect();

    let status_token = find_custom_property(&custom_properties, BUSY_STATUS_PROPERTY)
        .map(|value| value.trim().to_uppercase());

    Ok(CalendarEvent {
        title,
        start,
        end,
        location: text_prop(vevent, "LOCATION"),
        description: text_prop(vevent, "DESCRIPTION"),
        status_token,
    })
}

/// Parse a DTSTART/DTEND property, keeping its zone context.
fn parse_time_prop(prop: &Property) -> DeskStatusResult<EventTime> {
    let dpt = DatePerhapsTime::try_from(prop).map_err(|_| {
        DeskStatusError::Parse(format!(
            "Invalid {} value '{}'",
            prop.name.as_ref(),
            prop.val.as_ref()
        ))
    })?;

    Ok(to_event_time(dpt))
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

/// Text property value with RFC 5545 escapes removed, "" when absent.
fn text_prop(component: &Component, name: &str) -> String {
    component
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default()
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
