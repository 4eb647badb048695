//! Log severity levels and the filter used to select them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a log event as recorded by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    /// The exact string stored in the `level` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which log events a query should consider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SeverityFilter {
    /// Any severity.
    #[default]
    All,
    /// Only events with exactly this severity.
    Only(Severity),
}

impl SeverityFilter {
    /// The severity to match on, or `None` for [`SeverityFilter::All`].
    pub fn severity(&self) -> Option<Severity> {
        match self {
            SeverityFilter::All => None,
            SeverityFilter::Only(severity) => Some(*severity),
        }
    }
}

impl From<Severity> for SeverityFilter {
    fn from(severity: Severity) -> Self {
        SeverityFilter::Only(severity)
    }
}

impl std::fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityFilter::All => f.write_str("ALL"),
            SeverityFilter::Only(severity) => severity.fmt(f),
        }
    }
}

/// Rejected severity filter input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown parameter '{0}'. Only INFO, WARN, ERROR and ALL are valid parameters")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ALL") {
            return Ok(SeverityFilter::All);
        }
        s.parse::<Severity>().map(SeverityFilter::Only)
    }
}
