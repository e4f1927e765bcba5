mod email;

pub use email::MailService;

use chaincal_domain::Event;

/// Delivers a reminder for an event. Delivery is best effort, the scheduler
/// only logs failures and never retries.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    /// Returns whether the reminder was handed off to the transport
    async fn send_reminder(&self, event: &Event, recipient: Option<&str>) -> bool;
    /// Probe the transport at startup, result is informational only
    async fn test_connection(&self) -> bool;
}
