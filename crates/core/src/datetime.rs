//! Parsing of user-entered date/time values.
//!
//! Browsers submit `<input type="datetime-local">` values as
//! `YYYY-MM-DDTHH:MM` without an offset; those are taken as UTC. Values with
//! seconds and full RFC 3339 timestamps are accepted as well.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Formats tried (in order) for offset-less input.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a required date/time value. `field` names the input in the error.
pub fn parse_datetime(field: &str, value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid {field} '{value}'. Expected YYYY-MM-DDTHH:MM"
            ))
        })
}

/// Parse an optional date/time value; `None` and blank input yield `None`.
pub fn parse_optional_datetime(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Timestamp>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_datetime(field, v).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_datetime_local_format() {
        let dt = parse_datetime("due_date", "2023-12-25T15:30").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 12, 25));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (15, 30, 0));
    }

    #[test]
    fn parses_seconds_and_rfc3339() {
        let a = parse_datetime("start_time", "2024-01-02T03:04:05").unwrap();
        assert_eq!(a.second(), 5);

        let b = parse_datetime("start_time", "2024-01-02T05:04:05+02:00").unwrap();
        assert_eq!(b.hour(), 3);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_datetime("due_date", "25.12.2023").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("due_date"));
    }

    #[test]
    fn blank_optional_is_none() {
        assert_eq!(parse_optional_datetime("end_time", None).unwrap(), None);
        assert_eq!(parse_optional_datetime("end_time", Some("  ")).unwrap(), None);
        assert!(parse_optional_datetime("end_time", Some("2024-05-01T10:00"))
            .unwrap()
            .is_some());
    }
}
