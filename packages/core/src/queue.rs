//! Queue backlog types.

use serde::{Deserialize, Serialize};

/// Backlog of a single queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub queue_id: i64,
    pub queue_name: String,
    /// Data type of the items the queue holds.
    pub item_type: String,
    /// Number of items not yet processed.
    pub pending_count: u64,
}

/// Backlog of every queue on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueReport {
    /// One entry per queue, in the order the store listed them.
    pub queues: Vec<QueueSummary>,
    /// Number of queues listed, including those with nothing pending.
    pub total_queues: usize,
}

impl QueueReport {
    pub fn new(queues: Vec<QueueSummary>) -> Self {
        let total_queues = queues.len();
        Self {
            queues,
            total_queues,
        }
    }

    /// Pending items summed over all queues.
    pub fn total_pending(&self) -> u64 {
        self.queues.iter().map(|q| q.pending_count).sum()
    }

    pub fn get(&self, queue_id: i64) -> Option<&QueueSummary> {
        self.queues.iter().find(|q| q.queue_id == queue_id)
    }
}

impl FromIterator<QueueSummary> for QueueReport {
    fn from_iter<I: IntoIterator<Item = QueueSummary>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An unprocessed item waiting in a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingItem {
    pub queue_item_id: i64,
    /// Data type inherited from the owning queue.
    pub queue_item_type: String,
    #[serde(rename = "queue_value")]
    pub value: serde_json::Value,
    pub priority: i64,
}

/// Pending items of one queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingItems {
    pub queue_id: i64,
    pub items: Vec<PendingItem>,
}
