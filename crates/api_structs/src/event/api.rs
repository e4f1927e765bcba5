use crate::dtos::EventDTO;
use chaincal_domain::Event;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: EventDTO,
}

impl EventResponse {
    pub fn new(event: Event) -> Self {
        Self {
            event: EventDTO::new(event),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub contract_address: String,
        pub event_signature: String,
        pub event_args: Option<serde_json::Value>,
        /// Due time in unix millis, defaults to one hour from now
        pub next_timestamp: Option<i64>,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: i64,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_events {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub limit: Option<i64>,
        pub offset: Option<i64>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<EventDTO>,
        pub count: usize,
        pub total: i64,
        pub limit: i64,
        pub offset: i64,
    }

    impl APIResponse {
        pub fn new(events: Vec<Event>, total: i64, limit: i64, offset: i64) -> Self {
            let events = events.into_iter().map(EventDTO::new).collect::<Vec<_>>();
            Self {
                count: events.len(),
                events,
                total,
                limit,
                offset,
            }
        }
    }
}

pub mod get_upcoming_events {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub limit: Option<i64>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<EventDTO>,
        pub count: usize,
    }

    impl APIResponse {
        pub fn new(events: Vec<Event>) -> Self {
            let events = events.into_iter().map(EventDTO::new).collect::<Vec<_>>();
            Self {
                count: events.len(),
                events,
            }
        }
    }
}

pub mod snooze_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: i64,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// How far from now to push the reminder, in millis
        pub duration_millis: i64,
    }

    pub type APIResponse = EventResponse;
}
