mod inmemory;
mod redis;

use chaincal_domain::QueueEntry;
pub use inmemory::InMemoryReminderQueue;
pub use redis::{RedisReminderQueue, REMINDER_QUEUE_KEY};

/// Pending reminder due-times, tracked independently of the event store.
///
/// Two interchangeable backends implement this contract: a redis sorted set
/// and an in-memory map used as fallback when redis is unavailable. The
/// scheduler picks one at startup and must not be able to tell them apart.
#[async_trait::async_trait]
pub trait IReminderQueue: Send + Sync {
    /// Upsert: re-adding an event id overwrites its due time
    async fn add_reminder(&self, event_id: i64, due_at: i64) -> anyhow::Result<()>;
    /// All entries with due time <= `now` (boundary inclusive), in no
    /// particular order
    async fn get_due_reminders(&self, now: i64) -> anyhow::Result<Vec<i64>>;
    /// No-op when the event id is not present
    async fn remove_reminder(&self, event_id: i64) -> anyhow::Result<()>;
    /// Alias for [`add_reminder`](Self::add_reminder), named for call sites
    /// that are conceptually rescheduling
    async fn update_reminder(&self, event_id: i64, new_due_at: i64) -> anyhow::Result<()> {
        self.add_reminder(event_id, new_due_at).await
    }
    /// Full snapshot, for diagnostics
    async fn get_all_reminders(&self) -> anyhow::Result<Vec<QueueEntry>>;
}
