use super::IEventRepo;
use chaincal_domain::{Event, NewEvent};
use std::sync::Mutex;

pub struct InMemoryEventRepo {
    events: Mutex<Vec<Event>>,
    next_id: Mutex<i64>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn assign_id(&self) -> i64 {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        id
    }
}

impl Default for InMemoryEventRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &NewEvent) -> anyhow::Result<Event> {
        let event = Event {
            id: self.assign_id(),
            contract_address: e.contract_address.clone(),
            event_signature: e.event_signature.clone(),
            event_args: e.event_args.clone(),
            next_timestamp: e.next_timestamp,
            created: e.created,
            updated: e.updated,
        };
        let mut events = self.events.lock().unwrap();
        events.push(event.clone());
        Ok(event)
    }

    async fn find(&self, event_id: i64) -> Option<Event> {
        let events = self.events.lock().unwrap();
        events.iter().find(|e| e.id == event_id).cloned()
    }

    async fn find_due_before(&self, before_inc: i64) -> anyhow::Result<Vec<Event>> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| e.next_timestamp <= before_inc)
            .cloned()
            .collect())
    }

    async fn find_upcoming(&self, after_inc: i64, limit: i64) -> anyhow::Result<Vec<Event>> {
        let events = self.events.lock().unwrap();
        let mut upcoming = events
            .iter()
            .filter(|e| e.next_timestamp >= after_inc)
            .cloned()
            .collect::<Vec<_>>();
        upcoming.sort_by_key(|e| e.next_timestamp);
        upcoming.truncate(limit as usize);
        Ok(upcoming)
    }

    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Event>> {
        let events = self.events.lock().unwrap();
        let mut all = events.clone();
        all.sort_by(|e1, e2| e2.created.cmp(&e1.created));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let events = self.events.lock().unwrap();
        Ok(events.len() as i64)
    }

    async fn set_next_timestamp(
        &self,
        event_id: i64,
        next_timestamp: i64,
        updated: i64,
    ) -> anyhow::Result<Option<Event>> {
        let mut events = self.events.lock().unwrap();
        for event in events.iter_mut() {
            if event.id == event_id {
                event.next_timestamp = next_timestamp;
                event.updated = updated;
                return Ok(Some(event.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, event_id: i64) -> Option<Event> {
        let mut events = self.events.lock().unwrap();
        let pos = events.iter().position(|e| e.id == event_id)?;
        Some(events.remove(pos))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_event(next_timestamp: i64) -> NewEvent {
        NewEvent {
            contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
            event_signature: "Transfer(address,address,uint256)".into(),
            event_args: Default::default(),
            next_timestamp,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids_on_insert() {
        let repo = InMemoryEventRepo::new();
        let e1 = repo.insert(&new_event(10)).await.unwrap();
        let e2 = repo.insert(&new_event(20)).await.unwrap();
        assert_eq!(e1.id, 1);
        assert_eq!(e2.id, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn finds_due_events_boundary_inclusive() {
        let repo = InMemoryEventRepo::new();
        repo.insert(&new_event(10)).await.unwrap();
        repo.insert(&new_event(20)).await.unwrap();
        repo.insert(&new_event(30)).await.unwrap();

        let due = repo.find_due_before(20).await.unwrap();
        let mut due_ids = due.iter().map(|e| e.id).collect::<Vec<_>>();
        due_ids.sort_unstable();
        assert_eq!(due_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn updates_next_timestamp_for_single_event() {
        let repo = InMemoryEventRepo::new();
        let event = repo.insert(&new_event(10)).await.unwrap();
        let other = repo.insert(&new_event(10)).await.unwrap();

        let updated = repo
            .set_next_timestamp(event.id, 500, 100)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.next_timestamp, 500);
        assert_eq!(updated.updated, 100);

        let untouched = repo.find(other.id).await.unwrap();
        assert_eq!(untouched.next_timestamp, 10);
    }

    #[tokio::test]
    async fn set_next_timestamp_on_missing_event_returns_none() {
        let repo = InMemoryEventRepo::new();
        let res = repo.set_next_timestamp(42, 500, 100).await.unwrap();
        assert!(res.is_none());
    }
}
