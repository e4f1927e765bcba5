use crate::event::send_reminders::SendRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use chaincal_infra::ChainCalContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How far ahead of now the queue is seeded from the event store at startup
pub const REMINDER_LOOKAHEAD_MILLIS: i64 = 1000 * 60 * 60 * 24 * 7;

const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Seed the reminder queue from the event store, then tick every minute.
/// A tick that fires while the previous one is still running is skipped
/// entirely, bounding the scheduler to one in-flight tick.
pub fn start_send_reminders_job(ctx: ChainCalContext) {
    actix_web::rt::spawn(async move {
        if let Err(e) = initialize_reminders(&ctx).await {
            // Non-fatal: reminders created after startup still flow through
            // the queue subscribers
            error!("Failed to initialize reminders from the event store: {:?}", e);
        }

        let busy = Arc::new(AtomicBool::new(false));
        let mut tick = interval(TICK_INTERVAL);
        loop {
            tick.tick().await;
            actix_web::rt::spawn(run_tick(ctx.clone(), busy.clone()));
        }
    });
}

async fn initialize_reminders(ctx: &ChainCalContext) -> anyhow::Result<()> {
    let horizon = ctx.sys.get_timestamp_millis() + REMINDER_LOOKAHEAD_MILLIS;
    let upcoming = ctx.repos.events.find_due_before(horizon).await?;

    for event in &upcoming {
        ctx.queue
            .add_reminder(event.id, event.next_timestamp)
            .await?;
    }
    info!("Initialized {} reminder(s)", upcoming.len());
    Ok(())
}

async fn run_tick(ctx: ChainCalContext, busy: Arc<AtomicBool>) {
    if busy
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        warn!("Previous reminder tick still running, skipping");
        return;
    }

    let _ = execute(SendRemindersUseCase, &ctx).await;

    busy.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod test {
    use super::*;
    use chaincal_domain::{Event, NewEvent};
    use chaincal_infra::{INotifier, ISys};
    use std::sync::Mutex;

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
    async fn seeds_queue_within_lookahead_window() {
        let mut ctx = ChainCalContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(0));

        let within = insert_event(&ctx, REMINDER_LOOKAHEAD_MILLIS - 1).await;
        let _beyond = insert_event(&ctx, REMINDER_LOOKAHEAD_MILLIS + 1).await;

        initialize_reminders(&ctx).await.unwrap();

        let reminders = ctx.queue.get_all_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].event_id, within.id);
    }

    #[actix_web::main]
    #[test]
    async fn tick_is_skipped_while_previous_one_is_running() {
        let mut ctx = ChainCalContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(200));
        let notifier = Arc::new(RecordingNotifier::default());
        ctx.notifier = notifier.clone();

        let event = insert_event(&ctx, 100).await;
        ctx.queue.add_reminder(event.id, 100).await.unwrap();

        // Simulate an in-flight tick holding the guard
        let busy = Arc::new(AtomicBool::new(true));
        run_tick(ctx.clone(), busy.clone()).await;
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(ctx.queue.get_all_reminders().await.unwrap().len(), 1);
        // the skipped tick must not clear someone else's guard
        assert!(busy.load(Ordering::SeqCst));

        // Once the guard is released the next tick notifies exactly once
        busy.store(false, Ordering::SeqCst);
        run_tick(ctx.clone(), busy.clone()).await;
        assert_eq!(*notifier.sent.lock().unwrap(), vec![event.id]);
        assert!(!busy.load(Ordering::SeqCst));
    }
}
