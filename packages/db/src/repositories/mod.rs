//! Repository implementations for store queries.

mod log_repo;
mod queue_repo;

pub use log_repo::LogRepository;
pub use queue_repo::{PENDING_STATUS, QueueRepository};
