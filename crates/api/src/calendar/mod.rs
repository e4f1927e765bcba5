mod get_calendar_feed;

use actix_web::web;
use get_calendar_feed::get_calendar_feed_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/calendar.ics", web::get().to(get_calendar_feed_controller));
}
