use crate::error::ChainCalError;
use actix_web::{http::header, web, HttpResponse};
use chaincal_domain::Event;
use chaincal_infra::ChainCalContext;
use chrono::{DateTime, Duration};
use icalendar::{Calendar, Component, Event as CalendarEvent, EventLike};
use tracing::warn;

const FEED_LIMIT: i64 = 500;

pub async fn get_calendar_feed_controller(
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let now = ctx.sys.get_timestamp_millis();
    let upcoming = ctx
        .repos
        .events
        .find_upcoming(now, FEED_LIMIT)
        .await
        .map_err(|_| ChainCalError::InternalError)?;

    let calendar = build_calendar(&upcoming);

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/calendar; charset=utf-8"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"chaincal.ics\"",
        ))
        .insert_header((header::CACHE_CONTROL, "public, max-age=600"))
        .body(calendar.to_string()))
}

fn build_calendar(events: &[Event]) -> Calendar {
    let mut calendar = Calendar::new();
    calendar
        .name("ChainCal - On-Chain Events")
        .description("Your on-chain event reminders and notifications");

    for event in events {
        let start = match DateTime::from_timestamp_millis(event.next_timestamp) {
            Some(start) => start,
            None => {
                warn!("Event {} has an unrepresentable due time, skipping", event.id);
                continue;
            }
        };

        calendar.push(
            CalendarEvent::new()
                .uid(&format!("chaincal-{}@chaincal", event.id))
                .summary(event.event_name())
                .description(&format!(
                    "On-chain event reminder\n\nContract: {}\nEvent: {}\nEvent ID: #{}",
                    event.contract_address, event.event_signature, event.id
                ))
                .location(&format!("Ethereum - {}", event.contract_address_short()))
                .starts(start)
                .ends(start + Duration::hours(1))
                .done(),
        );
    }

    calendar.done()
}

#[cfg(test)]
mod test {
    use super::*;

    fn event(id: i64, next_timestamp: i64) -> Event {
        Event {
            id,
            contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
            event_signature: "Transfer(address,address,uint256)".into(),
            event_args: Default::default(),
            next_timestamp,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn renders_one_vevent_per_event() {
        let calendar = build_calendar(&[
            event(1, 1_700_000_000_000),
            event(2, 1_700_000_060_000),
        ]);
        let feed = calendar.to_string();

        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 2);
        assert!(feed.contains("UID:chaincal-1@chaincal"));
        assert!(feed.contains("UID:chaincal-2@chaincal"));
        assert!(feed.contains("SUMMARY:Transfer"));
    }

    #[test]
    fn empty_store_renders_empty_calendar() {
        let feed = build_calendar(&[]).to_string();
        assert!(feed.contains("BEGIN:VCALENDAR"));
        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 0);
    }
}
