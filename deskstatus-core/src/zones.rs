//! Rewriting of vendor time zone names into IANA identifiers.
//!
//! Exchange/Outlook feeds label `TZID`s with Windows zone names such as
//! `Central Asia Standard Time`, which no tz database knows about. The raw
//! feed text is rewritten before parsing so every `TZID` the parser sees can
//! be resolved by `chrono-tz`.

/// Windows zone name -> IANA identifier.
///
/// Entries are applied in order. Longer names come first so that a name which
/// is a substring of another (`Eastern Standard Time` inside
/// `US Eastern Standard Time`) is only replaced after the longer one.
pub const ZONE_ALIASES: &[(&str, &str)] = &[
    ("Central European Standard Time", "Europe/Warsaw"),
    ("Central Europe Standard Time", "Europe/Budapest"),
    ("Central Asia Standard Time", "Asia/Almaty"),
    ("Ekaterinburg Standard Time", "Asia/Yekaterinburg"),
    ("AUS Eastern Standard Time", "Australia/Sydney"),
    ("US Mountain Standard Time", "America/Phoenix"),
    ("US Eastern Standard Time", "America/Indiana/Indianapolis"),
    ("West Asia Standard Time", "Asia/Tashkent"),
    ("Qyzylorda Standard Time", "Asia/Qyzylorda"),
    ("Greenwich Standard Time", "Atlantic/Reykjavik"),
    ("W. Europe Standard Time", "Europe/Berlin"),
    ("E. Europe Standard Time", "Europe/Chisinau"),
    ("Singapore Standard Time", "Asia/Singapore"),
    ("Mountain Standard Time", "America/Denver"),
    ("Romance Standard Time", "Europe/Paris"),
    ("Russian Standard Time", "Europe/Moscow"),
    ("Arabian Standard Time", "Asia/Dubai"),
    ("Eastern Standard Time", "America/New_York"),
    ("Central Standard Time", "America/Chicago"),
    ("Pacific Standard Time", "America/Los_Angeles"),
    ("Turkey Standard Time", "Europe/Istanbul"),
    ("India Standard Time", "Asia/Kolkata"),
    ("China Standard Time", "Asia/Shanghai"),
    ("Tokyo Standard Time", "Asia/Tokyo"),
    ("GMT Standard Time", "Europe/London"),
    ("FLE Standard Time", "Europe/Kyiv"),
    ("GTB Standard Time", "Europe/Bucharest"),
];

/// Rewrite every built-in vendor zone name in `raw`.
pub fn normalize_zones(raw: &str) -> String {
    normalize_zones_with(raw, ZONE_ALIASES)
}

/// Rewrite every occurrence of each alias label, in table order.
pub fn normalize_zones_with(raw: &str, aliases: &[(&str, &str)]) -> String {
    let mut text = raw.to_string();
    for (label, iana) in aliases {
        if text.contains(label) {
            text = text.replace(label, iana);
        }
    }
    text
}
