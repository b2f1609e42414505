// Timestamp parsing and ISO week bucketing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

// `%#z` accepts `Z`, `+05:30`, `+0530` and `+05`
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

/// Parse an incident timestamp. Accepts RFC 3339 and the other common
/// ISO 8601 shapes (minute precision, colon-less offsets, basic format),
/// naive date-times (taken as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    ["%Y-%m-%d", "%Y%m%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ISO 8601 week number (1..=53). The year is deliberately not part of the
/// bucket, so week 1 of one year and week 1 of the next share a bucket.
pub fn iso_week(at: &DateTime<Utc>) -> u32 {
    at.iso_week().week()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-03-04T10:30:00+05:30").unwrap();
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_naive_variants() {
        assert!(parse_timestamp("2024-03-04T10:30:00").is_some());
        assert!(parse_timestamp("2024-03-04T10:30:00.123456").is_some());
        assert!(parse_timestamp("2024-03-04 10:30:00").is_some());
        assert_eq!(parse_timestamp("2024-03-04").unwrap().hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_parse_minute_precision_utc() {
        let dt = parse_timestamp("2024-03-04T10:30Z").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));
    }

    #[test]
    fn test_parse_minute_precision_naive() {
        let dt = parse_timestamp("2024-03-04T10:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));
    }

    #[test]
    fn test_parse_minute_precision_with_offset() {
        let dt = parse_timestamp("2024-03-04T10:30+05:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (5, 0));
    }

    #[test]
    fn test_parse_colonless_offset_with_fraction() {
        let dt = parse_timestamp("2024-03-04T10:30:00.000+0530").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (5, 0));
        let dt = parse_timestamp("2024-03-04T10:30:00-0100").unwrap();
        assert_eq!(dt.hour(), 11);
    }

    #[test]
    fn test_parse_basic_format() {
        let dt = parse_timestamp("20240304T103000Z").unwrap();
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (4, 10, 30));
        let dt = parse_timestamp("20240304T103000").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(parse_timestamp("20240304").unwrap().day(), 4);
    }

    #[test]
    fn test_iso_week_year_boundary() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025
        let dt = parse_timestamp("2024-12-30").unwrap();
        assert_eq!(iso_week(&dt), 1);
        let dt = parse_timestamp("2024-03-04").unwrap();
        assert_eq!(iso_week(&dt), 10);
    }
}
