use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const ELLIPSIS: &str = "...";

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Clips `text` to at most `max_bytes` UTF-8 bytes and appends an ellipsis when anything was cut.
/// The cut never splits a character, so the kept prefix may be a few bytes shorter than the limit.
#[must_use]
pub fn truncate_bytes(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }

    let mut clip_idx = max_bytes;
    while !text.is_char_boundary(clip_idx) {
        clip_idx -= 1;
    }

    let mut out = text[..clip_idx].to_string();
    out.push_str(ELLIPSIS);
    out
}

/// `NdNhNmNs` with every zero-valued component dropped; zero seconds renders as "".
#[must_use]
pub fn format_open_duration(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let parts = [
        (total_secs / SECS_PER_DAY, 'd'),
        ((total_secs % SECS_PER_DAY) / SECS_PER_HOUR, 'h'),
        ((total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE, 'm'),
        (total_secs % SECS_PER_MINUTE, 's'),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole seconds between `from` and `to`, never negative.
#[must_use]
pub fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}

/// Medium date-time style in the given zone, e.g. `Jan 5, 2024, 3:04 PM`.
#[must_use]
pub fn format_medium_datetime(at: DateTime<Utc>, zone: Tz) -> String {
    zone.from_utc_datetime(&at.naive_utc())
        .format("%b %-d, %Y, %-I:%M %p")
        .to_string()
}

#[must_use]
pub fn strip_spaces(text: &str) -> String {
    text.replace(' ', "")
}
