//! FHIR `date` / `dateTime` parsing.
//!
//! FHIR allows partial precision (`2024`, `2024-11`, `2024-11-25`) as well
//! as full RFC 3339 instants. Parsed values keep the offset they were
//! recorded with, so dates and times render as the source wrote them.
//! Ordering and comparisons against "now" still go by the absolute instant.
//! Values without an offset, and partial dates, are read as UTC; partial
//! dates land on the first instant they cover.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub fn parse_fhir_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant);
    }
    // Some exporters drop the offset entirely
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return as_utc(&naive);
    }

    let date = match value.len() {
        4 => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1),
        7 => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok(),
        _ => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
    }?;
    date.and_hms_opt(0, 0, 0).and_then(|naive| as_utc(&naive))
}

fn as_utc(naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(0).map(|utc| utc.from_utc_datetime(naive))
}

/// True when `instant` lies strictly after `now`, whatever its offset.
pub fn is_after(instant: &DateTime<FixedOffset>, now: DateTime<Utc>) -> bool {
    instant.with_timezone(&Utc) > now
}

/// `YYYY-MM-DD` in the recorded offset, or an empty string for unparseable input.
pub fn format_date(instant: Option<DateTime<FixedOffset>>) -> String {
    instant.map(|i| i.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// 12-hour clock time such as `09:30 AM`, in the recorded offset.
pub fn format_time(instant: Option<DateTime<FixedOffset>>) -> String {
    instant.map(|i| i.format("%I:%M %p").to_string()).unwrap_or_default()
}
