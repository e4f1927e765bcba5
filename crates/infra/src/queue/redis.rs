use super::IReminderQueue;
use chaincal_domain::QueueEntry;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::debug;

/// Sorted set holding all pending reminders, member is the event id and the
/// score is the due time in millis.
pub const REMINDER_QUEUE_KEY: &str = "chaincal:reminders";

pub struct RedisReminderQueue {
    manager: ConnectionManager,
}

impl RedisReminderQueue {
    /// Open a connection and prove it with a `PING` so that callers can fall
    /// back to the in-memory queue when redis is unreachable.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut con = manager.clone();
        redis::cmd("PING").query_async::<_, String>(&mut con).await?;

        Ok(Self { manager })
    }
}

#[async_trait::async_trait]
impl IReminderQueue for RedisReminderQueue {
    async fn add_reminder(&self, event_id: i64, due_at: i64) -> anyhow::Result<()> {
        let mut con = self.manager.clone();
        // ZADD with an existing member only updates its score
        con.zadd::<_, _, _, ()>(REMINDER_QUEUE_KEY, event_id, due_at)
            .await?;
        debug!("Added reminder for event {} due at {}", event_id, due_at);
        Ok(())
    }

    async fn get_due_reminders(&self, now: i64) -> anyhow::Result<Vec<i64>> {
        let mut con = self.manager.clone();
        let due: Vec<i64> = con.zrangebyscore(REMINDER_QUEUE_KEY, 0, now).await?;
        Ok(due)
    }

    async fn remove_reminder(&self, event_id: i64) -> anyhow::Result<()> {
        let mut con = self.manager.clone();
        // ZREM of an absent member is a no-op
        con.zrem::<_, _, ()>(REMINDER_QUEUE_KEY, event_id).await?;
        debug!("Removed reminder for event {}", event_id);
        Ok(())
    }

    async fn get_all_reminders(&self) -> anyhow::Result<Vec<QueueEntry>> {
        let mut con = self.manager.clone();
        let entries: Vec<(i64, i64)> = con
            .zrange_withscores(REMINDER_QUEUE_KEY, 0, -1)
            .await?;
        Ok(entries
            .into_iter()
            .map(|(event_id, due_at)| QueueEntry { event_id, due_at })
            .collect())
    }
}
