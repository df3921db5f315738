//! Timestamp helpers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::errors::{invalid, Result};

/// Timestamps are always UTC.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC time.
#[must_use]
pub fn utc_now() -> Timestamp {
    Utc::now()
}

/// Parses a `YYYYMMDD` date string.
pub fn parse_datestr(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|e| invalid("timedata", format!("Invalid date '{value}': {e}")))
}

/// Converts a `YYYYMMDD` date string to an ISO 8601 datetime string.
///
/// ```
/// use dataio::utils::convert_datestr_to_isoformat;
/// assert_eq!(convert_datestr_to_isoformat("20200101").unwrap(), "2020-01-01T00:00:00");
/// ```
pub fn convert_datestr_to_isoformat(value: &str) -> Result<String> {
    let date = parse_datestr(value)?;
    Ok(date.and_time(NaiveTime::MIN).format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_datestr() {
        assert_eq!(
            convert_datestr_to_isoformat("20181231").unwrap(),
            "2018-12-31T00:00:00"
        );
    }

    #[test]
    fn test_invalid_datestr() {
        let err = convert_datestr_to_isoformat("2018-12-31").unwrap_err();
        assert!(err.is_validation());
    }
}
