use chaincal_domain::Event;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: i64,
    pub contract_address: String,
    pub event_signature: String,
    pub event_args: serde_json::Value,
    /// Due time in unix millis
    pub next_timestamp: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            contract_address: event.contract_address,
            event_signature: event.event_signature,
            event_args: event.event_args,
            next_timestamp: event.next_timestamp,
            created_at: event.created,
            updated_at: event.updated,
        }
    }
}
