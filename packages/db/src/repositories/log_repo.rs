//! Log repository for latest-event lookups.

use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use telemetry_core::{
    Envelope, LatestTimestamp, LogRecord, NO_LOG_ENTRY, SecondsSinceLast, Severity,
    SeverityFilter, TimestampNormalizer,
};

use crate::{ConnectionProvider, DbError};

/// Read-only queries against the platform's `logs` table.
#[derive(Debug, Clone)]
pub struct LogRepository<P> {
    provider: P,
    normalizer: TimestampNormalizer,
}

/// Internal record type for full log rows.
#[derive(Debug, Deserialize)]
struct LogRow {
    log_id: i64,
    process_name: String,
    event_id: i64,
    level: String,
    message: String,
    additional_data: Option<String>,
    process_id: String,
    timestamp: String,
}

impl LogRow {
    fn into_record(self, normalizer: &TimestampNormalizer) -> Result<LogRecord, DbError> {
        let severity = severity(&self.level)?;
        let normalized_timestamp = normalize(normalizer, &self.timestamp)?;

        Ok(LogRecord {
            id: self.log_id,
            process_name: self.process_name,
            event_id: self.event_id,
            severity,
            message: self.message,
            additional_data: self.additional_data,
            process_id: self.process_id,
            raw_timestamp: self.timestamp,
            normalized_timestamp,
        })
    }
}

/// Internal record type for the timestamp-only projection.
#[derive(Debug, Deserialize)]
struct TimestampRow {
    level: String,
    timestamp: String,
}

fn severity(level: &str) -> Result<Severity, DbError> {
    level.parse().map_err(|_| {
        tracing::warn!("Stored log level is not recognized: {}", level);
        DbError::UnknownSeverity(level.to_string())
    })
}

fn normalize(normalizer: &TimestampNormalizer, raw: &str) -> Result<NaiveDateTime, DbError> {
    normalizer.normalize(raw).map_err(|e| {
        tracing::warn!("Stored log timestamp could not be normalized: {}", e);
        DbError::MalformedTimestamp(e)
    })
}

/// Newest-first lookup of a single row, optionally restricted to one level.
fn latest_query(projection: &str, filter: SeverityFilter) -> String {
    let where_clause = match filter {
        SeverityFilter::All => "",
        SeverityFilter::Only(_) => "WHERE level = $level",
    };

    format!(
        "SELECT {} FROM logs {} ORDER BY timestamp DESC LIMIT 1",
        projection, where_clause
    )
}

const FULL_PROJECTION: &str = "record::id(id) AS log_id, process_name, event_id, level, \
     message, additional_data, process_id, timestamp";

const TIMESTAMP_PROJECTION: &str = "level, timestamp";

impl<P: ConnectionProvider> LogRepository<P> {
    pub fn new(provider: P, normalizer: TimestampNormalizer) -> Self {
        Self {
            provider,
            normalizer,
        }
    }

    pub fn normalizer(&self) -> &TimestampNormalizer {
        &self.normalizer
    }

    async fn fetch_latest<T>(&self, projection: &str, filter: SeverityFilter) -> Result<Option<T>, DbError>
    where
        T: serde::de::DeserializeOwned,
    {
        let db = self.provider.acquire().await?;
        let query = latest_query(projection, filter);
        tracing::debug!(%filter, "Fetching latest log row");

        let mut request = db.query(&query);
        if let Some(severity) = filter.severity() {
            request = request.bind(("level", severity.as_str()));
        }

        let mut response = request.await?;
        let records: Vec<T> = response.take(0)?;

        Ok(records.into_iter().next())
    }

    /// Get the most recent log event matching `filter`.
    pub async fn latest(&self, filter: SeverityFilter) -> Result<Envelope<LogRecord>, DbError> {
        let row: Option<LogRow> = self.fetch_latest(FULL_PROJECTION, filter).await?;

        Envelope::from_option(row, NO_LOG_ENTRY).try_map(|row| row.into_record(&self.normalizer))
    }

    /// Get the severity and local time of the most recent log event matching `filter`.
    pub async fn latest_timestamp(&self, filter: SeverityFilter) -> Result<Envelope<LatestTimestamp>, DbError> {
        let row: Option<TimestampRow> = self.fetch_latest(TIMESTAMP_PROJECTION, filter).await?;

        Envelope::from_option(row, NO_LOG_ENTRY).try_map(|row| {
            Ok(LatestTimestamp {
                severity: severity(&row.level)?,
                timestamp: normalize(&self.normalizer, &row.timestamp)?,
            })
        })
    }

    /// Seconds elapsed since the most recent log event matching `filter`, measured
    /// against the current local time.
    pub async fn seconds_since_last(&self, filter: SeverityFilter) -> Result<Envelope<SecondsSinceLast>, DbError> {
        let latest = self.latest_timestamp(filter).await?;
        // Read the clock only once the row is in hand.
        Ok(latest.map(|latest| latest.elapsed_at(Local::now().naive_local())))
    }

    /// Like [`LogRepository::seconds_since_last`], measured against `now`.
    pub async fn seconds_since_last_at(
        &self,
        filter: SeverityFilter,
        now: NaiveDateTime,
    ) -> Result<Envelope<SecondsSinceLast>, DbError> {
        let latest = self.latest_timestamp(filter).await?;
        Ok(latest.map(|latest| latest.elapsed_at(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_query_has_no_condition() {
        assert_eq!(
            latest_query(TIMESTAMP_PROJECTION, SeverityFilter::All),
            "SELECT level, timestamp FROM logs  ORDER BY timestamp DESC LIMIT 1"
        );
    }

    #[test]
    fn filtered_query_binds_level() {
        let query = latest_query(TIMESTAMP_PROJECTION, SeverityFilter::Only(Severity::Warn));
        assert!(query.contains("WHERE level = $level"));
        assert!(!query.contains("WARN"));
    }

    #[test]
    fn unrecognized_level_is_named_in_error() {
        assert_eq!(severity("warn").ok(), Some(Severity::Warn));
        assert!(matches!(severity("DEBUG"), Err(DbError::UnknownSeverity(ref l)) if l == "DEBUG"));
    }
}
