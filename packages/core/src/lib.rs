//! Core domain types for the telemetry reader.
//!
//! This crate contains the types shared by the store layer and the front end:
//! - Severity and SeverityFilter for log classification
//! - LogRecord and its narrower projections
//! - QueueSummary and QueueReport for backlog reporting
//! - TimestampNormalizer for fixed-offset local time
//! - Envelope for found/not-found results

mod envelope;
mod log;
mod queue;
mod severity;
mod timestamp;

pub use envelope::{Envelope, NO_LOG_ENTRY, NO_QUEUE};
pub use log::{LatestTimestamp, LogRecord, SecondsSinceLast};
pub use queue::{PendingItem, PendingItems, QueueReport, QueueSummary};
pub use severity::{ParseSeverityError, Severity, SeverityFilter};
pub use timestamp::{TIMESTAMP_FORMAT, TimestampError, TimestampNormalizer, timestamp_format};
