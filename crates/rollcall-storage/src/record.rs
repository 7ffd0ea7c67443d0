//! Line format of the attendance log.
//!
//! Each event is one line: `<timestamp>,<attendee_id>`. The timestamp is an
//! RFC 3339 UTC instant with millisecond precision, the identifier a decimal
//! integer:
//!
//! ```text
//! 2025-01-15T12:30:00.250Z,6656
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use rollcall_core::{AttendeeData, CardId, constants::RECORD_SEPARATOR};

/// Render `event` as a log line, without the trailing newline.
pub fn format_record(event: &AttendeeData) -> String {
    format!(
        "{}{}{}",
        event.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
        RECORD_SEPARATOR,
        event.attendee_id()
    )
}

/// Parse one log line back into an event.
///
/// Returns a human-readable reason on failure; callers attach the line
/// number.
pub fn parse_record(line: &str) -> Result<AttendeeData, String> {
    let (timestamp, id) = line
        .trim_end()
        .split_once(RECORD_SEPARATOR)
        .ok_or_else(|| format!("missing '{RECORD_SEPARATOR}' separator"))?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| format!("bad timestamp {timestamp:?}: {e}"))?
        .with_timezone(&Utc);
    let id: u64 = id
        .parse()
        .map_err(|_| format!("bad attendee id {id:?}"))?;

    Ok(AttendeeData::with_timestamp(timestamp, CardId::new(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn sample() -> AttendeeData {
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        AttendeeData::with_timestamp(ts, CardId::new(6656))
    }

    #[test]
    fn test_format_record() {
        assert_eq!(format_record(&sample()), "2025-01-15T12:30:00.250Z,6656");
    }

    #[test]
    fn test_parse_record() {
        let parsed = parse_record("2025-01-15T12:30:00.250Z,6656\n").unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_record_with_offset() {
        let parsed = parse_record("2025-01-15T09:30:00.250-03:00,6656").unwrap();
        assert_eq!(parsed, sample());
    }

    #[rstest]
    #[case("")]
    #[case("2025-01-15T12:30:00Z")]
    #[case("yesterday,6656")]
    #[case("2025-01-15T12:30:00Z,abc")]
    #[case("2025-01-15T12:30:00Z,-1")]
    fn test_parse_record_invalid(#[case] line: &str) {
        assert!(parse_record(line).is_err());
    }
}
