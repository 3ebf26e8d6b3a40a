//! Wall-clock text <-> epoch seconds
//!
//! Relational date/time columns arrive as text in fixed layouts. All
//! conversions are UTC. A time of day is anchored on 1970-01-01, so its
//! epoch value is the number of seconds since midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};

use super::errors::{CodecError, CodecResult};

/// Layout of a relational DATE value
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d";
/// Layout of a relational TIME value
pub const SQL_TIME_FORMAT: &str = "%H:%M:%S";
/// Layout of a relational DATETIME value
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_date(text: &str) -> CodecResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), SQL_DATE_FORMAT)
        .map_err(|e| CodecError::invalid_value(format!("bad date '{}': {}", text, e)))
}

pub fn parse_time(text: &str) -> CodecResult<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), SQL_TIME_FORMAT)
        .map_err(|e| CodecError::invalid_value(format!("bad time '{}': {}", text, e)))
}

pub fn parse_datetime(text: &str) -> CodecResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), SQL_DATETIME_FORMAT)
        .map_err(|e| CodecError::invalid_value(format!("bad datetime '{}': {}", text, e)))
}

/// Seconds since epoch at 00:00:00 UTC of `date`
pub fn date_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Seconds since 1970-01-01T00:00:00 for a time of day
pub fn time_seconds(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

pub fn datetime_seconds(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp()
}

/// UTC instant for epoch seconds
pub fn from_epoch_seconds(seconds: i64) -> CodecResult<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|at| at.naive_utc())
        .ok_or_else(|| CodecError::invalid_value(format!("epoch {} out of range", seconds)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(SQL_DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(SQL_TIME_FORMAT).to_string()
}

pub fn format_datetime(at: NaiveDateTime) -> String {
    at.format(SQL_DATETIME_FORMAT).to_string()
}

/// RFC 3339 in UTC with a `Z` suffix, whole seconds
pub fn format_rfc3339(at: NaiveDateTime) -> String {
    at.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses RFC 3339 text into a UTC instant
pub fn parse_rfc3339(text: &str) -> CodecResult<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc).naive_utc())
        .map_err(|e| CodecError::invalid_value(format!("bad RFC 3339 timestamp '{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_seconds() {
        assert_eq!(date_seconds(parse_date("1970-01-02").unwrap()), 86_400);
        assert_eq!(date_seconds(parse_date("2020-01-01").unwrap()), 1_577_836_800);
        assert!(parse_date("2020-13-01").is_err());
    }

    #[test]
    fn test_time_anchored_on_epoch_day() {
        assert_eq!(time_seconds(parse_time("00:00:00").unwrap()), 0);
        assert_eq!(time_seconds(parse_time("01:02:03").unwrap()), 3_723);
        assert!(parse_time("25:00:00").is_err());
    }

    #[test]
    fn test_datetime_roundtrip_through_epoch() {
        let at = parse_datetime("2018-03-04 05:06:07").unwrap();
        let secs = datetime_seconds(at);
        assert_eq!(from_epoch_seconds(secs).unwrap(), at);
        assert_eq!(format_datetime(at), "2018-03-04 05:06:07");
    }

    #[test]
    fn test_rfc3339() {
        let at = parse_datetime("2018-03-04 05:06:07").unwrap();
        let text = format_rfc3339(at);
        assert_eq!(text, "2018-03-04T05:06:07Z");
        assert_eq!(parse_rfc3339(&text).unwrap(), at);
        assert_eq!(parse_rfc3339("2018-03-04T07:06:07+02:00").unwrap(), at);
        assert!(parse_rfc3339("2018-03-04 05:06:07").is_err());
    }
}
