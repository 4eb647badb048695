//! Queue repository for backlog reporting.

use std::collections::HashMap;

use serde::Deserialize;
use telemetry_core::{Envelope, NO_QUEUE, PendingItem, PendingItems, QueueReport, QueueSummary};

use crate::{ConnectionProvider, DbError};

/// Status value the platform uses for items that have not been processed yet.
pub const PENDING_STATUS: i64 = 0;

/// Read-only queries against the platform's `queues` and `queue_items` tables.
#[derive(Debug, Clone)]
pub struct QueueRepository<P> {
    provider: P,
}

/// Internal record type for queue listings.
#[derive(Debug, Deserialize)]
struct QueueRow {
    queue_id: i64,
    name: String,
    itemtype: String,
}

/// Internal record type for grouped pending counts.
#[derive(Debug, Deserialize)]
struct PendingCountRow {
    queue_id: i64,
    count: i64,
}

/// Internal record type for pending item listings.
#[derive(Debug, Deserialize)]
struct PendingItemRow {
    queue_item_id: i64,
    value: serde_json::Value,
    priority: i64,
}

/// Queue listing and pending counts in one round trip. The counts are grouped
/// over `queue_items` only, so idle queues are absent from the second result
/// and are filled in with zero when the two are merged.
const REPORT_QUERY: &str = r#"
SELECT record::id(id) AS queue_id, name, itemtype FROM queues;
SELECT queue_id, count() AS count FROM queue_items WHERE status = $pending GROUP BY queue_id;
"#;

const QUEUE_QUERY: &str = r#"
SELECT record::id(id) AS queue_id, name, itemtype FROM type::thing('queues', $queue_id);
SELECT record::id(id) AS queue_item_id, value, priority FROM queue_items
WHERE queue_id = $queue_id AND status = $pending
ORDER BY priority ASC, queue_item_id ASC;
"#;

/// Attach pending counts to queues, keeping listing order.
fn merge_counts(queues: Vec<QueueRow>, counts: Vec<PendingCountRow>) -> QueueReport {
    let counts: HashMap<i64, u64> = counts
        .into_iter()
        .map(|c| (c.queue_id, u64::try_from(c.count).unwrap_or(0)))
        .collect();

    queues
        .into_iter()
        .map(|q| QueueSummary {
            pending_count: counts.get(&q.queue_id).copied().unwrap_or(0),
            queue_id: q.queue_id,
            queue_name: q.name,
            item_type: q.itemtype,
        })
        .collect()
}

impl<P: ConnectionProvider> QueueRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Report every queue with its number of pending items.
    pub async fn report(&self) -> Result<QueueReport, DbError> {
        let db = self.provider.acquire().await?;

        let mut response = db
            .query(REPORT_QUERY)
            .bind(("pending", PENDING_STATUS))
            .await?;

        let queues: Vec<QueueRow> = response.take(0)?;
        let counts: Vec<PendingCountRow> = response.take(1)?;

        let report = merge_counts(queues, counts);
        tracing::debug!(
            total_queues = report.total_queues,
            total_pending = report.total_pending(),
            "Built queue report"
        );

        Ok(report)
    }

    /// List the pending items of one queue.
    pub async fn pending_items(&self, queue_id: i64) -> Result<Envelope<PendingItems>, DbError> {
        let db = self.provider.acquire().await?;

        let mut response = db
            .query(QUEUE_QUERY)
            .bind(("queue_id", queue_id))
            .bind(("pending", PENDING_STATUS))
            .await?;

        let queues: Vec<QueueRow> = response.take(0)?;
        let items: Vec<PendingItemRow> = response.take(1)?;

        let Some(queue) = queues.into_iter().next() else {
            tracing::debug!(queue_id, "Queue not found");
            return Ok(Envelope::not_found(NO_QUEUE));
        };

        let items = items
            .into_iter()
            .map(|item| PendingItem {
                queue_item_id: item.queue_item_id,
                queue_item_type: queue.itemtype.clone(),
                value: item.value,
                priority: item.priority,
            })
            .collect();

        Ok(Envelope::Success(PendingItems {
            queue_id: queue.queue_id,
            items,
        }))
    }
}
