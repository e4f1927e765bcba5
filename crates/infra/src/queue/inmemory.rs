use super::IReminderQueue;
use chaincal_domain::QueueEntry;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Fallback queue used when redis is not configured or unreachable. Entries
/// only live as long as the process, which is accepted: the scheduler
/// re-derives them from the event store at startup.
pub struct InMemoryReminderQueue {
    /// event id -> due time in millis
    reminders: Mutex<HashMap<i64, i64>>,
}

impl InMemoryReminderQueue {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryReminderQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderQueue for InMemoryReminderQueue {
    async fn add_reminder(&self, event_id: i64, due_at: i64) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        reminders.insert(event_id, due_at);
        debug!(
            "Added reminder for event {} due at {} (in-memory)",
            event_id, due_at
        );
        Ok(())
    }

    async fn get_due_reminders(&self, now: i64) -> anyhow::Result<Vec<i64>> {
        let reminders = self.reminders.lock().unwrap();
        Ok(reminders
            .iter()
            .filter(|(_, due_at)| **due_at <= now)
            .map(|(event_id, _)| *event_id)
            .collect())
    }

    async fn remove_reminder(&self, event_id: i64) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        reminders.remove(&event_id);
        debug!("Removed reminder for event {} (in-memory)", event_id);
        Ok(())
    }

    async fn get_all_reminders(&self) -> anyhow::Result<Vec<QueueEntry>> {
        let reminders = self.reminders.lock().unwrap();
        Ok(reminders
            .iter()
            .map(|(event_id, due_at)| QueueEntry {
                event_id: *event_id,
                due_at: *due_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn add_reminder_is_an_upsert() {
        let queue = InMemoryReminderQueue::new();
        queue.add_reminder(1, 100).await.unwrap();
        queue.add_reminder(1, 200).await.unwrap();

        let all = queue.get_all_reminders().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], QueueEntry { event_id: 1, due_at: 200 });
    }

    #[tokio::test]
    async fn update_reminder_overwrites_due_time() {
        let queue = InMemoryReminderQueue::new();
        queue.add_reminder(1, 100).await.unwrap();
        queue.update_reminder(1, 300).await.unwrap();

        let all = queue.get_all_reminders().await.unwrap();
        assert_eq!(all, vec![QueueEntry { event_id: 1, due_at: 300 }]);
    }

    #[tokio::test]
    async fn due_reminders_boundary_is_inclusive() {
        let queue = InMemoryReminderQueue::new();
        queue.add_reminder(1, 100).await.unwrap();
        queue.add_reminder(2, 200).await.unwrap();
        queue.add_reminder(3, 300).await.unwrap();

        let mut due = queue.get_due_reminders(200).await.unwrap();
        due.sort_unstable();
        assert_eq!(due, vec![1, 2]);
    }

    #[tokio::test]
    async fn remove_reminder_on_absent_id_is_a_noop() {
        let queue = InMemoryReminderQueue::new();
        queue.add_reminder(1, 100).await.unwrap();

        queue.remove_reminder(42).await.unwrap();

        let all = queue.get_all_reminders().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn removed_reminder_is_no_longer_due() {
        let queue = InMemoryReminderQueue::new();
        queue.add_reminder(1, 100).await.unwrap();
        queue.remove_reminder(1).await.unwrap();

        let due = queue.get_due_reminders(1000).await.unwrap();
        assert!(due.is_empty());
    }
}
