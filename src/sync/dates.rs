//! Lenient date parsing for catalog values

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar-date layouts tried in order
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Timestamp layouts without an offset
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses an air date.
///
/// Accepts plain dates (`2024-04-13`, `2024/04/13`, `04/13/2024`,
/// `April 13, 2024`, `13 Apr 2024`), RFC 3339 and RFC 2822 timestamps, and
/// timestamps without offset. Slashed dates with the year last are read
/// month first. Returns `None` for anything else.
pub(super) fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(raw) {
        return Some(timestamp.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// January 1 of `year`, where `year` is the catalog's textual year.
pub(super) fn release_date(year: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01-01", year.trim()), "%Y-%m-%d").ok()
}
