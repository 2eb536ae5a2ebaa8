//! Calendar helpers for checklist classification.
//!
//! All values are naive local time: the checklist API sends wall-clock
//! dates without an offset, and the classifier compares calendar days in
//! the caller's timezone.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Time formats accepted after a `DD/MM/YYYY` date.
const DAY_FIRST_TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Date-time formats tried for input starting with `YYYY-MM-DD`.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// Numeric fields accept unpadded values, so "%Y-%m-%d" covers "2024-3-4".
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%a %b %d %Y",
];

/// Monday-to-Sunday span containing a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    /// Monday 00:00:00.000
    pub start: NaiveDateTime,
    /// Sunday 23:59:59.999
    pub end: NaiveDateTime,
}

impl WeekRange {
    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Parse a date as sent by the checklist API.
///
/// Known shapes are tried first:
/// - `DD/MM/YYYY` with an optional `HH:MM[:SS[.fff]]` after whitespace
/// - `YYYY-MM-DD` with optional time and optional RFC 3339 offset
///
/// followed by a permissive list of other common layouts. Returns `None`
/// for empty input or when nothing matches; never panics.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if has_day_first_prefix(input) {
        return parse_day_first(input);
    }

    if has_iso_prefix(input) {
        if let Some(parsed) = parse_iso(input) {
            return Some(parsed);
        }
    }

    parse_fallback(input)
}

/// Truncate to 00:00:00.000 of the same calendar day.
pub fn normalize_to_day_start(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(NaiveTime::MIN)
}

/// Resolve the Monday-based week containing `instant`.
///
/// Sunday belongs to the week that started on the preceding Monday.
/// Saturates at the edges of the representable calendar.
pub fn week_range(instant: NaiveDateTime) -> WeekRange {
    let offset = u64::from(instant.weekday().num_days_from_monday());
    let monday = instant
        .date()
        .checked_sub_days(Days::new(offset))
        .unwrap_or(NaiveDate::MIN);
    let start = monday.and_time(NaiveTime::MIN);

    let end = start
        .checked_add_signed(TimeDelta::days(7) - TimeDelta::milliseconds(1))
        .unwrap_or(NaiveDateTime::MAX);

    WeekRange { start, end }
}

fn has_day_first_prefix(input: &str) -> bool {
    matches_digit_shape(input, "dd/dd/dddd")
}

fn has_iso_prefix(input: &str) -> bool {
    matches_digit_shape(input, "dddd-dd-dd")
}

/// `d` in the pattern matches an ASCII digit, anything else matches itself.
fn matches_digit_shape(input: &str, pattern: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() >= pattern.len()
        && pattern
            .bytes()
            .zip(bytes)
            .all(|(p, b)| if p == b'd' { b.is_ascii_digit() } else { p == *b })
}

fn parse_day_first(input: &str) -> Option<NaiveDateTime> {
    let mut parts = input.splitn(2, char::is_whitespace);
    let date = NaiveDate::parse_from_str(parts.next()?, "%d/%m/%Y").ok()?;

    let time = match parts.next().map(str::trim) {
        None | Some("") => NaiveTime::MIN,
        Some(raw) => DAY_FIRST_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())?,
    };

    Some(date.and_time(time))
}

fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }

    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_fallback(input: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc2822(input) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
