//! Command-line reader for platform telemetry.
//!
//! Each subcommand runs one query against the store and prints the result as
//! JSON on stdout. Logs go to stderr.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use db::repositories::{LogRepository, QueueRepository};
use db::SurrealConnector;
use serde::Serialize;
use telemetry_core::{SeverityFilter, TimestampNormalizer};
use tracing_subscriber::EnvFilter;

use config::MonitorConfig;

#[derive(Parser, Debug)]
#[command(name = "monitor")]
#[command(about = "Read log and queue telemetry from the automation platform store", version)]
struct Args {
    /// Seconds subtracted from stored timestamps (overrides MONITOR_TIME_OFFSET_SECS)
    #[arg(long, allow_hyphen_values = true)]
    time_offset: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most recent log record
    Latest {
        /// INFO, WARN, ERROR or ALL
        #[arg(default_value = "ALL")]
        severity: SeverityFilter,
    },
    /// Timestamp of the most recent log record
    LatestTimestamp {
        /// INFO, WARN, ERROR or ALL
        #[arg(default_value = "ALL")]
        severity: SeverityFilter,
    },
    /// Seconds since the most recent log record
    SinceLast {
        /// INFO, WARN, ERROR or ALL
        #[arg(default_value = "ALL")]
        severity: SeverityFilter,
    },
    /// Pending item counts for every queue
    Queues,
    /// Pending items of one queue
    QueueItems {
        queue_id: i64,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = MonitorConfig::from_env()?;
    if let Some(offset) = args.time_offset {
        config.time_offset_secs = offset;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        endpoint = %config.db.endpoint,
        time_offset_secs = config.time_offset_secs,
        "Running {:?}",
        args.command
    );

    let connector = SurrealConnector::new(config.db);
    let normalizer = TimestampNormalizer::new(config.time_offset_secs);

    match args.command {
        Command::Latest { severity } => {
            let logs = LogRepository::new(connector, normalizer);
            print_json(&logs.latest(severity).await?)
        }
        Command::LatestTimestamp { severity } => {
            let logs = LogRepository::new(connector, normalizer);
            print_json(&logs.latest_timestamp(severity).await?)
        }
        Command::SinceLast { severity } => {
            let logs = LogRepository::new(connector, normalizer);
            print_json(&logs.seconds_since_last(severity).await?)
        }
        Command::Queues => {
            let queues = QueueRepository::new(connector);
            print_json(&queues.report().await?)
        }
        Command::QueueItems { queue_id } => {
            let queues = QueueRepository::new(connector);
            print_json(&queues.pending_items(queue_id).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemetry_core::Severity;

    #[test]
    fn severity_defaults_to_all() {
        let args = Args::try_parse_from(["monitor", "latest"]).expect("valid args");
        assert!(matches!(
            args.command,
            Command::Latest {
                severity: SeverityFilter::All
            }
        ));
    }

    #[test]
    fn severity_is_case_insensitive() {
        let args = Args::try_parse_from(["monitor", "since-last", "error"]).expect("valid args");
        assert!(matches!(
            args.command,
            Command::SinceLast {
                severity: SeverityFilter::Only(Severity::Error)
            }
        ));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        assert!(Args::try_parse_from(["monitor", "latest-timestamp", "DEBUG"]).is_err());
    }

    #[test]
    fn negative_offset_is_accepted() {
        let args = Args::try_parse_from(["monitor", "--time-offset", "-3600", "queues"])
            .expect("valid args");
        assert_eq!(args.time_offset, Some(-3600));
        assert!(matches!(args.command, Command::Queues));
    }

    #[test]
    fn queue_items_requires_numeric_id() {
        assert!(Args::try_parse_from(["monitor", "queue-items", "abc"]).is_err());
        let args = Args::try_parse_from(["monitor", "queue-items", "6"]).expect("valid args");
        assert!(matches!(args.command, Command::QueueItems { queue_id: 6 }));
    }
}
