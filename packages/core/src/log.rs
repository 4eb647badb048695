//! Log event records and the projections derived from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Severity, timestamp_format};

/// The most recent log event, as read from the platform's `logs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Platform id of the log row.
    #[serde(rename = "log_id")]
    pub id: i64,
    /// Name of the process that emitted the event.
    #[serde(rename = "process-name")]
    pub process_name: String,
    pub event_id: i64,
    #[serde(rename = "log_level")]
    pub severity: Severity,
    pub message: String,
    pub additional_data: Option<String>,
    /// Platform id of the process that emitted the event.
    pub process_id: String,
    /// Timestamp exactly as stored, in the platform's fixed zone.
    pub raw_timestamp: String,
    /// `raw_timestamp` shifted to local time.
    #[serde(rename = "timestamp", with = "timestamp_format")]
    pub normalized_timestamp: NaiveDateTime,
}

impl LogRecord {
    pub fn latest_timestamp(&self) -> LatestTimestamp {
        LatestTimestamp {
            severity: self.severity,
            timestamp: self.normalized_timestamp,
        }
    }
}

/// Severity and local time of the most recent matching event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestTimestamp {
    #[serde(rename = "log_level")]
    pub severity: Severity,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl LatestTimestamp {
    /// Total seconds elapsed between this event and `now`.
    ///
    /// Negative when the event lies in the future relative to `now`.
    pub fn elapsed_at(&self, now: NaiveDateTime) -> SecondsSinceLast {
        SecondsSinceLast {
            severity: self.severity,
            seconds_since_last: (now - self.timestamp).num_seconds(),
        }
    }
}

/// Elapsed time since the most recent matching event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondsSinceLast {
    #[serde(rename = "log_level")]
    pub severity: Severity,
    #[serde(rename = "seconds_since_last_log")]
    pub seconds_since_last: i64,
}
