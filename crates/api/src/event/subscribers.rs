use super::create_event::CreateEventUseCase;
use super::snooze_event::SnoozeEventUseCase;
use crate::shared::usecase::Subscriber;
use crate::webhook::receive_webhook::{ProcessedWebhook, ReceiveWebhookUseCase};
use chaincal_infra::ChainCalContext;
use tracing::error;

// These subscribers uphold the store/queue invariant: every write that
// creates or moves an event's `next_timestamp` also upserts the matching
// queue entry.

pub struct CreateReminderOnEventCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateEventUseCase> for CreateReminderOnEventCreated {
    async fn notify(&self, e: &chaincal_domain::Event, ctx: &ChainCalContext) {
        if let Err(err) = ctx.queue.add_reminder(e.id, e.next_timestamp).await {
            error!("Unable to enqueue reminder for event {}: {:?}", e.id, err);
        }
    }
}

pub struct EnqueueRemindersOnWebhookReceived;

#[async_trait::async_trait(?Send)]
impl Subscriber<ReceiveWebhookUseCase> for EnqueueRemindersOnWebhookReceived {
    async fn notify(&self, processed: &ProcessedWebhook, ctx: &ChainCalContext) {
        for e in &processed.events {
            if let Err(err) = ctx.queue.add_reminder(e.id, e.next_timestamp).await {
                error!("Unable to enqueue reminder for event {}: {:?}", e.id, err);
            }
        }
    }
}

pub struct SyncReminderOnEventSnoozed;

#[async_trait::async_trait(?Send)]
impl Subscriber<SnoozeEventUseCase> for SyncReminderOnEventSnoozed {
    async fn notify(&self, e: &chaincal_domain::Event, ctx: &ChainCalContext) {
        if let Err(err) = ctx.queue.update_reminder(e.id, e.next_timestamp).await {
            error!("Unable to reschedule reminder for event {}: {:?}", e.id, err);
        }
    }
}
