//! Timestamp normalization at the store boundary.
//!
//! Timestamps arrive in three shapes depending on where a meal entry came
//! from: RFC 3339 strings, epoch milliseconds, or document-service
//! `{seconds, nanoseconds}` pairs. They are normalized here, once, into
//! `DateTime<Utc>`; every other module consumes only the canonical type.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("invalid timestamp: {0}")]
    Invalid(String),
}

/// A timestamp as it may arrive from the document service or older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Document-service timestamp object.
    Seconds {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
    /// Epoch milliseconds.
    EpochMillis(i64),
    /// RFC 3339 string.
    Rfc3339(String),
}

impl RawTimestamp {
    /// Normalizes to the canonical instant type.
    pub fn normalize(&self) -> Result<DateTime<Utc>, TimestampError> {
        match self {
            RawTimestamp::Seconds {
                seconds,
                nanoseconds,
            } => Utc
                .timestamp_opt(*seconds, *nanoseconds)
                .single()
                .ok_or_else(|| {
                    TimestampError::Invalid(format!("seconds={} out of range", seconds))
                }),
            RawTimestamp::EpochMillis(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .ok_or_else(|| TimestampError::Invalid(format!("millis={} out of range", millis))),
            RawTimestamp::Rfc3339(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| TimestampError::Invalid(format!("'{}': {}", text, e))),
        }
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        RawTimestamp::Rfc3339(ts.to_rfc3339())
    }
}

/// The local calendar date of an instant; daily records are keyed by it.
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// ISO `YYYY-MM-DD` document key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_forms_normalize_to_same_instant() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();

        let from_string = RawTimestamp::Rfc3339("2025-06-01T12:30:00Z".to_string());
        let from_millis = RawTimestamp::EpochMillis(expected.timestamp_millis());
        let from_seconds = RawTimestamp::Seconds {
            seconds: expected.timestamp(),
            nanoseconds: 0,
        };

        assert_eq!(from_string.normalize().unwrap(), expected);
        assert_eq!(from_millis.normalize().unwrap(), expected);
        assert_eq!(from_seconds.normalize().unwrap(), expected);
    }

    #[test]
    fn test_invalid_string_is_an_error() {
        let raw = RawTimestamp::Rfc3339("yesterday".to_string());
        assert!(raw.normalize().is_err());
    }

    #[test]
    fn test_untagged_decoding() {
        let from_obj: RawTimestamp =
            serde_json::from_str(r#"{"seconds": 1748780000, "nanoseconds": 0}"#).unwrap();
        assert!(matches!(from_obj, RawTimestamp::Seconds { .. }));

        let from_num: RawTimestamp = serde_json::from_str("1748780000000").unwrap();
        assert!(matches!(from_num, RawTimestamp::EpochMillis(_)));

        let from_str: RawTimestamp = serde_json::from_str("\"2025-06-01T12:30:00Z\"").unwrap();
        assert!(matches!(from_str, RawTimestamp::Rfc3339(_)));
    }

    #[test]
    fn test_date_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(date_key(date), "2025-06-01");
    }
}
