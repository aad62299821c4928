//! Lenient date parsing for pipeline payloads
//!
//! The pipeline writes calendar dates as `YYYY-MM-DD` but some exports carry a
//! full timestamp in the same field. Timestamps are truncated to their date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date, accepting a trailing time component
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    parse_timestamp(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Parse the forecast generation timestamp
///
/// Accepts RFC 3339, a naive ISO datetime (read as UTC) or a bare date
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(midnight_utc)
        .map_err(|_| format!("invalid timestamp '{}'", raw))
}

/// Midnight UTC of the given day
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(parse_date("2025-01-02").unwrap(), expected);
        assert_eq!(parse_date("2025-01-02T00:00:00").unwrap(), expected);
        assert_eq!(parse_date(" 2025-01-02 00:00:00 ").unwrap(), expected);
        assert!(parse_date("02/01/2025").is_err());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let ts = parse_timestamp("2025-01-02T21:30:00.123456").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(ts.hour(), 21);

        let offset = parse_timestamp("2025-01-02T23:30:00-03:00").unwrap();
        assert_eq!(offset.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(offset.hour(), 2);

        let bare = parse_timestamp("2025-01-02").unwrap();
        assert_eq!(bare, midnight_utc(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
    }
}
