use crate::shared::usecase::UseCase;
use chaincal_infra::ChainCalContext;
use tracing::{debug, error, info, warn};

/// One scheduler tick: drain the due entries from the reminder queue,
/// re-validate each against the event store, and hand the still-due ones to
/// the notifier.
///
/// Each due entry is processed independently, a failure on one never halts
/// the rest. The queue entry is removed after the notification attempt no
/// matter its outcome: at most one attempt per due transition, no delivery
/// retry.
#[derive(Debug)]
pub struct SendRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    QueueError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    /// Ids of the events whose reminder fired this tick
    type Response = Vec<i64>;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminders";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .queue
            .get_due_reminders(now)
            .await
            .map_err(|_| UseCaseError::QueueError)?;

        if due.is_empty() {
            return Ok(Vec::new());
        }
        info!("Processing {} due reminder(s)", due.len());

        let mut fired = Vec::new();
        for event_id in due {
            match process_reminder(event_id, now, ctx).await {
                Ok(true) => fired.push(event_id),
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to process reminder for event {}: {:?}", event_id, e);
                }
            }
        }

        Ok(fired)
    }
}

/// Returns whether the reminder for `event_id` fired.
async fn process_reminder(
    event_id: i64,
    now: i64,
    ctx: &ChainCalContext,
) -> anyhow::Result<bool> {
    let event = match ctx.repos.events.find(event_id).await {
        Some(event) => event,
        None => {
            // Deleted upstream, the queue entry is all that is left
            warn!(
                "Event {} not found in store, removing reminder from queue",
                event_id
            );
            ctx.queue.remove_reminder(event_id).await?;
            return Ok(false);
        }
    };

    // Queue and store can disagree on the due time. The store wins, the
    // entry stays in place and is re-evaluated next tick.
    if event.next_timestamp > now {
        debug!("Event {} not yet due, skipping", event_id);
        return Ok(false);
    }

    let delivered = ctx.notifier.send_reminder(&event, None).await;
    if !delivered {
        warn!("Reminder for event {} was not delivered", event_id);
    }

    ctx.queue.remove_reminder(event_id).await?;
    Ok(true)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use chaincal_domain::{Event, NewEvent};
    use chaincal_infra::{INotifier, ISys};
    use std::sync::{Arc, Mutex};

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<i64>>,
    }

    #[async_trait::async_trait]
    impl INotifier for RecordingNotifier {
        async fn send_reminder(&self, event: &Event, _recipient: Option<&str>) -> bool {
            self.sent.lock().unwrap().push(event.id);
            true
        }

        async fn test_connection(&self) -> bool {
            true
        }
    }

    async fn setup(now: i64) -> (ChainCalContext, Arc<RecordingNotifier>) {
        let mut ctx = ChainCalContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(now));
        let notifier = Arc::new(RecordingNotifier::default());
        ctx.notifier = notifier.clone();
        (ctx, notifier)
    }

    async fn insert_event(ctx: &ChainCalContext, next_timestamp: i64) -> Event {
        ctx.repos
            .events
            .insert(&NewEvent {
                contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
                event_signature: "Transfer(address,address,uint256)".into(),
                event_args: Default::default(),
                next_timestamp,
                created: 0,
                updated: 0,
            })
            .await
            .unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn notifies_due_event_once_and_clears_queue_entry() {
        let (ctx, notifier) = setup(200).await;
        let event = insert_event(&ctx, 100).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();

        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(fired, vec![event.id]);
        assert_eq!(*notifier.sent.lock().unwrap(), vec![event.id]);

        // queue entry is gone, the store row remains
        assert!(ctx.queue.get_all_reminders().await.unwrap().is_empty());
        assert!(ctx.repos.events.find(event.id).await.is_some());

        // the next tick has nothing left to do
        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert!(fired.is_empty());
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn due_boundary_is_inclusive() {
        let (ctx, notifier) = setup(100).await;
        let event = insert_event(&ctx, 100).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();

        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(fired, vec![event.id]);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn removes_queue_entry_of_deleted_event() {
        let (ctx, notifier) = setup(200).await;
        let event = insert_event(&ctx, 100).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();
        ctx.repos.events.delete(event.id).await.unwrap();

        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert!(fired.is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert!(ctx.queue.get_all_reminders().await.unwrap().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn skewed_entry_is_left_for_the_next_tick() {
        let (ctx, notifier) = setup(200).await;
        // store says due at 500, queue claims 100: queue and store disagree
        let event = insert_event(&ctx, 500).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();

        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert!(fired.is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());

        let reminders = ctx.queue.get_all_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].event_id, event.id);
    }

    #[actix_web::main]
    #[test]
    async fn notifier_failure_still_removes_queue_entry() {
        struct FailingNotifier;
        #[async_trait::async_trait]
        impl INotifier for FailingNotifier {
            async fn send_reminder(&self, _event: &Event, _recipient: Option<&str>) -> bool {
                false
            }
            async fn test_connection(&self) -> bool {
                false
            }
        }

        let mut ctx = ChainCalContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(200));
        ctx.notifier = Arc::new(FailingNotifier);

        let event = insert_event(&ctx, 100).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();

        let fired = execute(SendRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(fired, vec![event.id]);
        assert!(ctx.queue.get_all_reminders().await.unwrap().is_empty());
    }
}
