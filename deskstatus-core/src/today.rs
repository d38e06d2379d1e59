//! Selection of the events that still matter today.

use chrono::{DateTime, Days, NaiveTime};
use chrono_tz::Tz;

use crate::error::{DeskStatusError, DeskStatusResult};
use crate::localize::{LocalizedEvent, resolve_wall_clock};

/// `[start, end)` between two consecutive local midnights of the reference zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodayWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TodayWindow {
    /// Window of the local calendar day containing `now`.
    ///
    /// The end is the next local midnight, so the window is 23 or 25 hours
    /// long on DST change days.
    pub fn containing(now: &DateTime<Tz>) -> DeskStatusResult<Self> {
        let zone = now.timezone();
        let date = now.date_naive();
        let next = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| DeskStatusError::Localization(format!("No day after {}", date)))?;

        Ok(TodayWindow {
            start: resolve_wall_clock(zone, date.and_time(NaiveTime::MIN))?,
            end: resolve_wall_clock(zone, next.and_time(NaiveTime::MIN))?,
        })
    }

    pub fn overlaps(&self, event: &LocalizedEvent) -> bool {
        let end = event.effective_end();
        if end == event.start {
            return self.start <= event.start && event.start < self.end;
        }
        event.start < self.end && end > self.start
    }
}

/// Keep events that overlap today and have not ended by `now`.
///
/// Events without an end are never treated as concluded. The result is in
/// chronological order of start; events starting together keep feed order.
pub fn filter_today(
    events: impl IntoIterator<Item = LocalizedEvent>,
    now: &DateTime<Tz>,
    window: &TodayWindow,
) -> Vec<LocalizedEvent> {
    let mut today: Vec<LocalizedEvent> = events
        .into_iter()
        .filter(|event| !event.end.is_some_and(|end| end <= *now))
        .filter(|event| window.overlaps(event))
        .collect();

    today.sort_by_key(|event| event.start);
    today
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use chrono_tz::{Asia::Almaty, Europe::London};

    fn at(d: u32, h: u32, m: u32) -> DateTime<Tz> {
        Almaty.with_ymd_and_hms(2025, 6, d, h, m, 0).unwrap()
    }

    fn event(title: &str, start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> LocalizedEvent {
        LocalizedEvent {
            title: title.to_string(),
            start,
            end,
            location: String::new(),
            description: String::new(),
            status_token: None,
        }
    }

    fn titles(events: &[LocalizedEvent]) -> Vec<&str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_window_is_local_midnight_to_midnight() {
        let window = TodayWindow::containing(&at(10, 13, 5)).unwrap();
        assert_eq!(window.start, at(10, 0, 0));
        assert_eq!(window.end, at(11, 0, 0));
    }

    #[test]
    fn test_window_on_dst_change_day() {
        let now = London.with_ymd_and_hms(2025, 3, 30, 12, 0, 0).unwrap();
        let window = TodayWindow::containing(&now).unwrap();

        assert_eq!(window.start.hour(), 0);
        assert_eq!(window.end - window.start, chrono::Duration::hours(23));
    }

    #[test]
    fn test_concluded_events_are_dropped() {
        let now = at(10, 12, 0);
        let window = TodayWindow::containing(&now).unwrap();
        let events = vec![
            event("early", at(10, 6, 0), Some(at(10, 7, 0))),
            event("just ended", at(10, 11, 0), Some(at(10, 12, 0))),
            event("running", at(10, 11, 30), Some(at(10, 12, 30))),
        ];

        let today = filter_today(events, &now, &window);
        assert_eq!(titles(&today), ["running"]);
    }

    #[test]
    fn test_other_days_are_dropped() {
        let now = at(10, 8, 0);
        let window = TodayWindow::containing(&now).unwrap();
        let events = vec![
            event("tomorrow", at(11, 9, 0), Some(at(11, 10, 0))),
            event("at midnight", at(11, 0, 0), Some(at(11, 1, 0))),
            event("overnight", at(9, 22, 0), Some(at(10, 9, 0))),
            event("later", at(10, 15, 0), Some(at(10, 16, 0))),
        ];

        let today = filter_today(events, &now, &window);
        assert_eq!(titles(&today), ["overnight", "later"]);
    }

    #[test]
    fn test_event_without_end_is_kept_even_if_started() {
        let now = at(10, 12, 0);
        let window = TodayWindow::containing(&now).unwrap();
        let events = vec![
            event("marker", at(10, 9, 0), None),
            event("yesterday marker", at(9, 9, 0), None),
        ];

        let today = filter_today(events, &now, &window);
        assert_eq!(titles(&today), ["marker"]);
    }

    #[test]
    fn test_result_is_chronological_and_stable() {
        let now = at(10, 8, 0);
        let window = TodayWindow::containing(&now).unwrap();
        let events = vec![
            event("b", at(10, 14, 0), Some(at(10, 15, 0))),
            event("a1", at(10, 9, 0), Some(at(10, 10, 0))),
            event("a2", at(10, 9, 0), Some(at(10, 9, 30))),
        ];

        let today = filter_today(events, &now, &window);
        assert_eq!(titles(&today), ["a1", "a2", "b"]);
    }
}
