use serde::{Deserialize, Serialize};

/// One pending reminder in the queue: which event and when it is due.
///
/// Entries are value-unique per `event_id`, re-adding the same id overwrites
/// the due time instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueEntry {
    pub event_id: i64,
    /// Due time in unix millis
    pub due_at: i64,
}
