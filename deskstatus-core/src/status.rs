//! Aggregate presence status.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::localize::LocalizedEvent;

/// Availability shown to visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceStatus {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "tentative")]
    Tentative,
    #[serde(rename = "busy")]
    Busy,
    #[serde(rename = "out of office")]
    OutOfOffice,
}

impl PresenceStatus {
    /// Map a busy-status token (already uppercased) to a status.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "FREE" => Some(PresenceStatus::Free),
            "TENTATIVE" => Some(PresenceStatus::Tentative),
            "BUSY" => Some(PresenceStatus::Busy),
            "OOF" => Some(PresenceStatus::OutOfOffice),
            _ => None,
        }
    }

    /// Priority used when several events are active at once.
    pub fn rank(self) -> u8 {
        match self {
            PresenceStatus::Free => 1,
            PresenceStatus::Tentative => 2,
            PresenceStatus::Busy => 3,
            PresenceStatus::OutOfOffice => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PresenceStatus::Free => "free",
            PresenceStatus::Tentative => "tentative",
            PresenceStatus::Busy => "busy",
            PresenceStatus::OutOfOffice => "out of office",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Running maximum over the events active at `now`.
///
/// Only a strictly higher rank replaces the current best, so among equally
/// ranked events the first one observed wins.
#[derive(Debug, Clone)]
pub struct StatusResolver {
    now: DateTime<Tz>,
    best_rank: u8,
    best: PresenceStatus,
}

impl StatusResolver {
    pub fn new(now: DateTime<Tz>) -> Self {
        StatusResolver {
            now,
            best_rank: 0,
            best: PresenceStatus::Free,
        }
    }

    pub fn observe(&mut self, event: &LocalizedEvent) {
        if !event.is_active_at(&self.now) {
            return;
        }
        let Some(token) = event.status_token.as_deref() else {
            return;
        };
        // Unknown tokens rank 0 and can never beat the baseline
        let Some(status) = PresenceStatus::from_token(token) else {
            return;
        };

        if status.rank() > self.best_rank {
            self.best_rank = status.rank();
            self.best = status;
        }
    }

    pub fn status(&self) -> PresenceStatus {
        self.best
    }
}

/// Resolve the aggregate status of `events` at `now`.
pub fn resolve_status<'a>(
    events: impl IntoIterator<Item = &'a LocalizedEvent>,
    now: DateTime<Tz>,
) -> PresenceStatus {
    let mut resolver = StatusResolver::new(now);
    for event in events {
        resolver.observe(event);
    }
    resolver.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Almaty;

    fn at(h: u32, m: u32) -> DateTime<Tz> {
        Almaty.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap()
    }

    fn event(token: Option<&str>, start: (u32, u32), end: Option<(u32, u32)>) -> LocalizedEvent {
        LocalizedEvent {
            title: String::new(),
            start: at(start.0, start.1),
            end: end.map(|(h, m)| at(h, m)),
            location: String::new(),
            description: String::new(),
            status_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_oof_beats_busy_in_either_order() {
        let oof = event(Some("OOF"), (9, 0), Some((10, 0)));
        let busy = event(Some("BUSY"), (9, 30), Some((11, 0)));
        let now = at(9, 45);

        assert_eq!(resolve_status([&oof, &busy], now), PresenceStatus::OutOfOffice);
        assert_eq!(resolve_status([&busy, &oof], now), PresenceStatus::OutOfOffice);
    }

    #[test]
    fn test_priority_ordering() {
        let now = at(12, 0);
        let tentative = event(Some("TENTATIVE"), (11, 0), Some((13, 0)));
        let free = event(Some("FREE"), (11, 0), Some((13, 0)));
        let busy = event(Some("BUSY"), (11, 0), Some((13, 0)));

        assert_eq!(resolve_status([&free, &tentative], now), PresenceStatus::Tentative);
        assert_eq!(
            resolve_status([&tentative, &busy, &free], now),
            PresenceStatus::Busy
        );
    }

    #[test]
    fn test_nothing_active_is_free() {
        let later = event(Some("BUSY"), (15, 0), Some((16, 0)));
        assert_eq!(resolve_status([&later], at(9, 0)), PresenceStatus::Free);
        assert_eq!(
            resolve_status(Vec::<&LocalizedEvent>::new(), at(9, 0)),
            PresenceStatus::Free
        );
    }

    #[test]
    fn test_tokenless_or_unknown_events_do_not_raise_status() {
        let now = at(10, 0);
        let plain = event(None, (9, 0), Some((11, 0)));
        let odd = event(Some("WORKINGELSEWHERE"), (9, 0), Some((11, 0)));
        let tentative = event(Some("TENTATIVE"), (9, 0), Some((11, 0)));

        assert_eq!(resolve_status([&plain, &odd], now), PresenceStatus::Free);
        assert_eq!(
            resolve_status([&tentative, &plain, &odd], now),
            PresenceStatus::Tentative
        );
    }

    #[test]
    fn test_active_bounds_are_inclusive() {
        let busy = event(Some("BUSY"), (9, 0), Some((10, 0)));
        assert_eq!(resolve_status([&busy], at(9, 0)), PresenceStatus::Busy);
        assert_eq!(resolve_status([&busy], at(10, 0)), PresenceStatus::Busy);
        assert_eq!(resolve_status([&busy], at(10, 1)), PresenceStatus::Free);
    }

    #[test]
    fn test_event_without_end_is_active_only_at_its_start() {
        let marker = event(Some("OOF"), (9, 0), None);
        assert_eq!(resolve_status([&marker], at(9, 0)), PresenceStatus::OutOfOffice);
        assert_eq!(resolve_status([&marker], at(9, 1)), PresenceStatus::Free);
    }

    #[test]
    fn test_token_ranks() {
        let rank = |token| PresenceStatus::from_token(token).map_or(0, PresenceStatus::rank);
        assert_eq!(rank("OOF"), 4);
        assert_eq!(rank("BUSY"), 3);
        assert_eq!(rank("TENTATIVE"), 2);
        assert_eq!(rank("FREE"), 1);
        assert_eq!(rank("ELSEWHERE"), 0);
    }

    #[test]
    fn test_labels_serialize_as_wire_strings() {
        assert_eq!(
            serde_json::to_string(&PresenceStatus::OutOfOffice).unwrap(),
            "\"out of office\""
        );
        assert_eq!(PresenceStatus::Tentative.to_string(), "tentative");
    }
}
