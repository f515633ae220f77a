//! Lenient publish-date parsing shared by the `date/{pubdate}` route and the
//! JSON body of a book.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Wire format used when a date-time is written out.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Years a date may carry, the four-digit calendar.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parse a date or date-time. Offsets are dropped and the wall-clock time kept,
/// so the calendar day is the one the caller wrote. Years outside 1..=9999 are
/// not dates.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    let parsed = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.naive_local()),
        Err(_) => DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
    };

    parsed.filter(|dt| YEARS.contains(&dt.year()))
}

/// Calendar day of a route value, time-of-day truncated.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    parse_date_time(value).map(|dt| dt.date())
}

/// Serde adapter accepting any format [`parse_date_time`] understands.
pub mod flexible {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(super::WIRE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a valid date", raw)))
    }
}
