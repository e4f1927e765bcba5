pub mod receive_webhook;

use actix_web::web;
use receive_webhook::receive_webhook_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::post().to(receive_webhook_controller));
}
