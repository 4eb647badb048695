//! Runtime configuration for the monitor binary.

use anyhow::{Context, Result};
use db::DbConfig;

/// Offset applied when none is configured: GMT to Danish winter time.
pub const DEFAULT_TIME_OFFSET_SECS: i64 = -3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Store connection settings.
    pub db: DbConfig,
    /// Seconds subtracted from stored timestamps to obtain local time.
    pub time_offset_secs: i64,
    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`.
    pub log_level: String,
}

impl MonitorConfig {
    /// Build a config from environment variables.
    ///
    /// Store keys are documented on [`DbConfig::from_env`]; in addition
    /// `MONITOR_TIME_OFFSET_SECS` and `MONITOR_LOG_LEVEL` are read.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db = DbConfig::from_lookup(&lookup)?;

        let time_offset_secs = match lookup("MONITOR_TIME_OFFSET_SECS") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("MONITOR_TIME_OFFSET_SECS must be an integer, got '{raw}'"))?,
            _ => DEFAULT_TIME_OFFSET_SECS,
        };

        let log_level = lookup("MONITOR_LOG_LEVEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            db,
            time_offset_secs,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() -> Result<()> {
        let config = MonitorConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config.db, DbConfig::memory());
        assert_eq!(config.time_offset_secs, DEFAULT_TIME_OFFSET_SECS);
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn reads_offset_and_level() -> Result<()> {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("MONITOR_TIME_OFFSET_SECS", " -7200 "),
            ("MONITOR_LOG_LEVEL", "debug"),
            ("MONITOR_DB_ENDPOINT", "ws://robot-db:8000"),
        ]))?;
        assert_eq!(config.time_offset_secs, -7200);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.db.endpoint, "ws://robot-db:8000");
        Ok(())
    }

    #[test]
    fn rejects_non_numeric_offset() {
        let result = MonitorConfig::from_lookup(lookup(&[("MONITOR_TIME_OFFSET_SECS", "one hour")]));
        assert!(result.is_err());
    }

    #[test]
    fn surfaces_store_config_errors() {
        let result = MonitorConfig::from_lookup(lookup(&[("MONITOR_DB_USER", "reader")]));
        assert!(result.is_err());
    }
}
