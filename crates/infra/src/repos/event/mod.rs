mod inmemory;
mod postgres;

use chaincal_domain::{Event, NewEvent};
pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Insert a new event and return the stored row with its assigned id
    async fn insert(&self, e: &NewEvent) -> anyhow::Result<Event>;
    async fn find(&self, event_id: i64) -> Option<Event>;
    /// All events with `next_timestamp <= before_inc`
    async fn find_due_before(&self, before_inc: i64) -> anyhow::Result<Vec<Event>>;
    /// Events with `next_timestamp >= after_inc`, ordered by due time ascending
    async fn find_upcoming(&self, after_inc: i64, limit: i64) -> anyhow::Result<Vec<Event>>;
    /// Newest events first
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Event>>;
    async fn count(&self) -> anyhow::Result<i64>;
    /// Single row update of the due time, returns the updated event or `None`
    /// if the event no longer exists
    async fn set_next_timestamp(
        &self,
        event_id: i64,
        next_timestamp: i64,
        updated: i64,
    ) -> anyhow::Result<Option<Event>>;
    async fn delete(&self, event_id: i64) -> Option<Event>;
}
