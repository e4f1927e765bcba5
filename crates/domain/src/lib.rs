mod event;
mod reminder;

pub use event::{Event, NewEvent, UNKNOWN_EVENT_SIGNATURE};
pub use reminder::QueueEntry;
