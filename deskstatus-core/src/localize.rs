//! Conversion of event times into the reference zone.
//!
//! A floating time means "this wall-clock time wherever the viewer is", so it
//! keeps its numbers and only gets the reference zone attached. A UTC or
//! `TZID` time names an exact instant and is re-expressed in the reference
//! zone.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{DeskStatusError, DeskStatusResult};
use crate::event::{CalendarEvent, EventTime};

/// An event whose times are all expressed in the reference zone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedEvent {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: Option<DateTime<Tz>>,
    pub location: String,
    pub description: String,
    pub status_token: Option<String>,
}

impl LocalizedEvent {
    /// End used for activity checks: the start when the event has no end.
    pub fn effective_end(&self) -> DateTime<Tz> {
        self.end.unwrap_or(self.start)
    }

    pub fn is_active_at(&self, now: &DateTime<Tz>) -> bool {
        self.start <= *now && *now <= self.effective_end()
    }
}

pub fn localize_event(event: CalendarEvent, zone: Tz) -> DeskStatusResult<LocalizedEvent> {
    let start = localize_time(&event.start, zone)?;
    let end = event
        .end
        .as_ref()
        .map(|end| localize_time(end, zone))
        .transpose()?;

    Ok(LocalizedEvent {
        title: event.title,
        start,
        end,
        location: event.location,
        description: event.description,
        status_token: event.status_token,
    })
}

pub fn localize_time(time: &EventTime, zone: Tz) -> DeskStatusResult<DateTime<Tz>> {
    match time {
        EventTime::Date(date) => resolve_wall_clock(zone, date.and_time(NaiveTime::MIN)),
        EventTime::DateTimeFloating(naive) => resolve_wall_clock(zone, *naive),
        EventTime::DateTimeUtc(dt) => Ok(dt.with_timezone(&zone)),
        EventTime::DateTimeZoned { datetime, tzid } => {
            let source = parse_zone(tzid)?;
            Ok(resolve_wall_clock(source, *datetime)?.with_timezone(&zone))
        }
    }
}

/// Look up an IANA zone name, as written in a `TZID` parameter.
pub fn parse_zone(tzid: &str) -> DeskStatusResult<Tz> {
    tzid.trim()
        .trim_matches('"')
        .parse::<Tz>()
        .map_err(|_| DeskStatusError::Localization(format!("Unknown time zone '{}'", tzid)))
}

/// Pin a wall-clock time to `zone`.
///
/// Repeated times (DST fall-back) take the earlier instant. Times skipped by a
/// DST jump are read one hour later, which lands just past the gap.
pub fn resolve_wall_clock(zone: Tz, naive: NaiveDateTime) -> DeskStatusResult<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| {
            DeskStatusError::Localization(format!("{} does not exist in {}", naive, zone))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Utc};
    use chrono_tz::{America::New_York, Asia::Almaty, Europe::London};

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_floating_time_keeps_wall_clock() {
        let time = EventTime::DateTimeFloating(naive(2025, 6, 10, 9, 15));

        for zone in [Almaty, London, New_York] {
            let local = localize_time(&time, zone).unwrap();
            assert_eq!((local.hour(), local.minute()), (9, 15));
            assert_eq!(local.timezone(), zone);
        }
    }

    #[test]
    fn test_zoned_time_in_reference_zone_is_unchanged() {
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 6, 10, 14, 30),
            tzid: "Asia/Almaty".to_string(),
        };

        let local = localize_time(&time, Almaty).unwrap();
        assert_eq!(local.naive_local(), naive(2025, 6, 10, 14, 30));
    }

    #[test]
    fn test_zoned_time_is_converted() {
        // 09:00 in Almaty (UTC+5) is 05:00 in London (BST, UTC+1)
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 6, 10, 9, 0),
            tzid: "Asia/Almaty".to_string(),
        };

        let local = localize_time(&time, London).unwrap();
        assert_eq!(local.naive_local(), naive(2025, 6, 10, 5, 0));
    }

    #[test]
    fn test_utc_time_is_converted() {
        let time = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap());

        let local = localize_time(&time, New_York).unwrap();
        assert_eq!(local.naive_local(), naive(2025, 1, 15, 7, 0));
    }

    #[test]
    fn test_all_day_date_is_floating_midnight() {
        let time = EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());

        let local = localize_time(&time, Almaty).unwrap();
        assert_eq!(local.naive_local(), naive(2025, 6, 10, 0, 0));
    }

    #[test]
    fn test_unknown_zone_is_a_localization_error() {
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 6, 10, 9, 0),
            tzid: "Customized Time Zone".to_string(),
        };

        assert!(matches!(
            localize_time(&time, London),
            Err(DeskStatusError::Localization(_))
        ));
    }

    #[test]
    fn test_quoted_tzid_is_accepted() {
        assert_eq!(parse_zone("\"Europe/London\"").unwrap(), London);
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        // 01:30 on 2025-03-30 does not exist in London
        let local = resolve_wall_clock(London, naive(2025, 3, 30, 1, 30)).unwrap();
        assert_eq!(local.naive_local(), naive(2025, 3, 30, 2, 30));
    }

    #[test]
    fn test_dst_overlap_takes_earlier_instant() {
        // 01:30 on 2025-10-26 happens twice in London; first one is BST
        let local = resolve_wall_clock(London, naive(2025, 10, 26, 1, 30)).unwrap();
        assert_eq!(
            local.with_timezone(&Utc).naive_utc(),
            naive(2025, 10, 26, 0, 30)
        );
    }

    #[test]
    fn test_missing_end_uses_start_for_activity() {
        let event = CalendarEvent {
            title: "Marker".into(),
            start: EventTime::DateTimeFloating(naive(2025, 6, 10, 9, 0)),
            end: None,
            location: String::new(),
            description: String::new(),
            status_token: None,
        };

        let local = localize_event(event, Almaty).unwrap();
        assert_eq!(local.end, None);
        assert_eq!(local.effective_end(), local.start);
        assert!(local.is_active_at(&local.start));
    }
}
