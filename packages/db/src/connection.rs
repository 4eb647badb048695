//! Scoped connections to the platform store.
//!
//! Every query operation acquires its own handle through a [`ConnectionProvider`]
//! and drops it before returning, so no connection outlives the call that opened it.

use std::future::Future;

use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use telemetry_core::TimestampError;
use thiserror::Error;

/// Database connection handle.
pub type Database = Surreal<Any>;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Endpoint such as "mem://" or "ws://host:8000"; the scheme selects the engine.
    pub endpoint: String,
    /// Namespace to use
    pub namespace: String,
    /// Database name to use
    pub database: String,
    /// Optional credentials for authentication
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "processrobot".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// Create a config for an in-memory store.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a config for a remote store.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set credentials for authentication.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Build a config from environment variables.
    ///
    /// - `MONITOR_DB_ENDPOINT` (default `mem://`)
    /// - `MONITOR_DB_NAMESPACE`, `MONITOR_DB_DATABASE`
    /// - `MONITOR_DB_USER` and `MONITOR_DB_PASSWORD`, which must be set together
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, using the same keys as [`DbConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DbError> {
        let get = |key: &str| lookup(key).and_then(non_empty);
        let mut config = Self::default();

        if let Some(endpoint) = get("MONITOR_DB_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(namespace) = get("MONITOR_DB_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Some(database) = get("MONITOR_DB_DATABASE") {
            config.database = database;
        }

        config.credentials = match (get("MONITOR_DB_USER"), get("MONITOR_DB_PASSWORD")) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(DbError::Config(
                    "MONITOR_DB_PASSWORD is required when MONITOR_DB_USER is set".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(DbError::Config(
                    "MONITOR_DB_USER is required when MONITOR_DB_PASSWORD is set".into(),
                ));
            }
        };

        Ok(config)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(#[source] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(#[from] surrealdb::Error),
    #[error(transparent)]
    MalformedTimestamp(#[from] TimestampError),
    #[error("Unknown log level '{0}'")]
    UnknownSeverity(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Source of scoped store handles.
///
/// The returned handle is owned by the caller and released when dropped, on
/// success, on error, and when the surrounding future is cancelled.
pub trait ConnectionProvider: Send + Sync {
    fn acquire(&self) -> impl Future<Output = Result<Database, DbError>> + Send;
}

impl<P: ConnectionProvider> ConnectionProvider for &P {
    fn acquire(&self) -> impl Future<Output = Result<Database, DbError>> + Send {
        (**self).acquire()
    }
}

/// Opens a fresh connection to the configured endpoint on every acquire.
#[derive(Debug, Clone)]
pub struct SurrealConnector {
    config: DbConfig,
}

impl SurrealConnector {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }
}

impl ConnectionProvider for SurrealConnector {
    async fn acquire(&self) -> Result<Database, DbError> {
        let config = &self.config;
        tracing::debug!("Connecting to database: {}", config.endpoint);

        let db = connect(config.endpoint.as_str())
            .await
            .map_err(DbError::Connection)?;

        // Authenticate if credentials provided
        if let Some((username, password)) = &config.credentials {
            db.signin(Root {
                username,
                password,
            })
            .await
            .map_err(DbError::Connection)?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(DbError::Connection)?;

        tracing::debug!(
            "Connected to database: {}/{}",
            config.namespace,
            config.database
        );

        Ok(db)
    }
}

/// Hands out clones of an already open handle.
///
/// Used when the store lives in-process, where each fresh `mem://` connection
/// would otherwise see an empty datastore.
#[derive(Debug, Clone)]
pub struct SharedConnection {
    db: Database,
}

impl SharedConnection {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl ConnectionProvider for SharedConnection {
    async fn acquire(&self) -> Result<Database, DbError> {
        Ok(self.db.clone())
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
    fn defaults_to_in_memory_store() -> Result<(), DbError> {
        let config = DbConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, DbConfig::memory());
        Ok(())
    }

    #[test]
    fn reads_endpoint_and_credentials() -> Result<(), DbError> {
        let config = DbConfig::from_lookup(lookup(&[
            ("MONITOR_DB_ENDPOINT", "ws://robot-db:8000"),
            ("MONITOR_DB_NAMESPACE", "robot"),
            ("MONITOR_DB_DATABASE", " prod "),
            ("MONITOR_DB_USER", "reader"),
            ("MONITOR_DB_PASSWORD", "secret"),
        ]))?;

        let expected = DbConfig::remote("ws://robot-db:8000")
            .with_namespace("robot")
            .with_database("prod")
            .with_credentials("reader", "secret");
        assert_eq!(config, expected);
        Ok(())
    }

    #[test]
    fn rejects_half_configured_credentials() {
        let result = DbConfig::from_lookup(lookup(&[("MONITOR_DB_USER", "reader")]));
        assert!(matches!(result, Err(DbError::Config(_))));

        let result = DbConfig::from_lookup(lookup(&[("MONITOR_DB_PASSWORD", "secret")]));
        assert!(matches!(result, Err(DbError::Config(_))));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() -> Result<(), DbError> {
        let config = DbConfig::from_lookup(lookup(&[("MONITOR_DB_ENDPOINT", "  ")]))?;
        assert_eq!(config.endpoint, "mem://");
        Ok(())
    }
}
