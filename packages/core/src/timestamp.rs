//! Conversion of stored timestamps into local time.
//!
//! The platform records every timestamp in one fixed zone as text. Local time is
//! obtained by subtracting a static offset in seconds; the offset does not follow
//! daylight saving changes.

use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

/// Format of stored timestamps once any fractional seconds are removed.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a stored timestamp could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Malformed timestamp '{raw}': {reason}")]
    Malformed { raw: String, reason: String },
    #[error("Timestamp '{raw}' is out of range after applying offset {offset_secs}s")]
    OutOfRange { raw: String, offset_secs: i64 },
}

impl TimestampError {
    /// The stored value that failed to normalize.
    pub fn raw(&self) -> &str {
        match self {
            TimestampError::Malformed { raw, .. } | TimestampError::OutOfRange { raw, .. } => raw,
        }
    }
}

/// Applies the configured fixed offset to stored timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampNormalizer {
    offset_secs: i64,
}

impl TimestampNormalizer {
    /// Create a normalizer that subtracts `offset_secs` from every stored timestamp.
    ///
    /// A negative offset moves the result forward, e.g. `-3600` turns GMT into
    /// Danish winter time.
    pub fn new(offset_secs: i64) -> Self {
        Self { offset_secs }
    }

    pub fn offset_secs(&self) -> i64 {
        self.offset_secs
    }

    /// Parse a stored timestamp and shift it to local time.
    pub fn normalize(&self, raw: &str) -> Result<NaiveDateTime, TimestampError> {
        let whole_seconds = raw.split('.').next().unwrap_or(raw).trim();

        let parsed = NaiveDateTime::parse_from_str(whole_seconds, TIMESTAMP_FORMAT).map_err(|e| {
            TimestampError::Malformed {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        TimeDelta::try_seconds(self.offset_secs)
            .and_then(|offset| parsed.checked_sub_signed(offset))
            .ok_or_else(|| TimestampError::OutOfRange {
                raw: raw.to_string(),
                offset_secs: self.offset_secs,
            })
    }
}

/// Serde adapter writing timestamps in [`TIMESTAMP_FORMAT`].
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
