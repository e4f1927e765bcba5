mod create_event;
mod get_event;
mod get_events;
mod get_upcoming_events;
pub mod send_reminders;
mod snooze_event;
pub mod subscribers;

use actix_web::web;
use create_event::create_event_controller;
use get_event::get_event_controller;
use get_events::get_events_controller;
use get_upcoming_events::get_upcoming_events_controller;
use snooze_event::snooze_event_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events", web::get().to(get_events_controller));

    // Must be registered before the `{event_id}` routes
    cfg.route(
        "/events/upcoming",
        web::get().to(get_upcoming_events_controller),
    );

    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/events/{event_id}/snooze",
        web::patch().to(snooze_event_controller),
    );
}
