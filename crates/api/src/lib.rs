mod calendar;
mod error;
mod event;
mod job_schedulers;
mod shared;
mod status;
mod webhook;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use chaincal_infra::ChainCalContext;
use job_schedulers::start_send_reminders_job;
use std::net::TcpListener;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    calendar::configure_routes(cfg);
    event::configure_routes(cfg);
    status::configure_routes(cfg);
    webhook::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: ChainCalContext) -> Result<Self, std::io::Error> {
        verify_connections(&context).await?;

        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: ChainCalContext) {
        start_send_reminders_job(context);
    }

    async fn configure_server(context: ChainCalContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .configure(configure_server_api)
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Startup probes. The event store is required for correctness, so an
/// unreachable store aborts the startup. The notifier probe is informational.
async fn verify_connections(ctx: &ChainCalContext) -> Result<(), std::io::Error> {
    if let Err(e) = ctx.repos.events.count().await {
        error!("Database connection failed: {:?}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "event store unreachable",
        ));
    }
    info!("Database connection OK");

    if ctx.notifier.test_connection().await {
        info!("Notifier connection OK");
    } else {
        warn!("Notifier unavailable or not configured, reminders will not be delivered");
    }

    Ok(())
}
