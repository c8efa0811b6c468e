//! Timestamp formatting for API responses

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Render a timestamp as ISO-8601 with millisecond precision in a fixed UTC offset
///
/// An out-of-range offset falls back to UTC.
pub fn format_timestamp(timestamp: DateTime<Utc>, offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    timestamp
        .with_timezone(&offset)
        .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_in_wib() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 20, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts, 7), "2024-02-01T03:30:00.000+07:00");
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 20, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts, 99), "2024-01-31T20:30:00.000+00:00");
    }
}
