//! Naive local timestamps with whole-second precision.
//!
//! Timestamps are stored as fixed-width text, so comparing the stored strings
//! orders them chronologically. No timezone is attached or normalized.

use chrono::{Local, NaiveDateTime, ParseResult, SubsecRound};

/// Text form of every stored timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock time, truncated to the second
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn test_format_drops_subseconds() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(7, 5, 3, 999)
            .unwrap();
        assert_eq!(format_timestamp(t), "2024-03-09 07:05:03");
    }

    #[test]
    fn test_parse_format() {
        let t = parse_timestamp("2024-12-31 23:59:59").unwrap();
        assert_eq!(format_timestamp(t), "2024-12-31 23:59:59");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_timestamp("2024-12-31T23:59:59Z").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_text_order_is_chronological() {
        let earlier = parse_timestamp("2024-01-09 23:00:00").unwrap();
        let later = parse_timestamp("2024-01-10 01:00:00").unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
    }
}
