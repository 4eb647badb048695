//! SurrealDB access to the automation platform's store.
//!
//! This crate provides scoped connections and read-only repositories for the
//! platform's log and queue tables.
//!
//! # Features
//!
//! - `memory` (default): In-memory engine, used by tests
//! - `remote`: WebSocket and HTTP engines for a running store

mod connection;
pub mod repositories;

pub use connection::{ConnectionProvider, Database, DbConfig, DbError, SharedConnection, SurrealConnector};
