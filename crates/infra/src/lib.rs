mod config;
mod queue;
mod repos;
mod services;
mod system;

pub use config::{Config, MailConfig};
pub use queue::{IReminderQueue, InMemoryReminderQueue, RedisReminderQueue, REMINDER_QUEUE_KEY};
pub use repos::{IEventRepo, Repos};
pub use services::{INotifier, MailService};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ChainCalContext {
    pub repos: Repos,
    pub queue: Arc<dyn IReminderQueue>,
    pub notifier: Arc<dyn INotifier>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl ChainCalContext {
    /// Context backed entirely by in-process state. Used by tests.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            queue: Arc::new(InMemoryReminderQueue::new()),
            notifier: Arc::new(MailService::disabled()),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment.
///
/// The event store is required: missing or invalid postgres credentials abort
/// the process. The reminder queue and the mail transport degrade to their
/// fallbacks instead.
pub async fn setup_context() -> ChainCalContext {
    let config = Config::new();

    let repos = Repos::create_postgres(&get_psql_connection_string())
        .await
        .expect("Postgres credentials must be set and valid");

    let queue = create_reminder_queue(&config).await;
    let notifier: Arc<dyn INotifier> = Arc::new(MailService::new(&config.mail));

    ChainCalContext {
        repos,
        queue,
        notifier,
        config,
        sys: Arc::new(RealSys {}),
    }
}

/// Prefer the redis sorted set when `REDIS_URL` is set and reachable,
/// otherwise fall back to the in-memory queue. The selected backend is used
/// for the lifetime of the process.
async fn create_reminder_queue(config: &Config) -> Arc<dyn IReminderQueue> {
    match &config.redis_url {
        Some(url) => match RedisReminderQueue::connect(url).await {
            Ok(queue) => {
                info!("Connected to redis reminder queue");
                Arc::new(queue)
            }
            Err(e) => {
                warn!(
                    "Redis connection failed, falling back to in-memory reminder queue: {:?}",
                    e
                );
                Arc::new(InMemoryReminderQueue::new())
            }
        },
        None => {
            info!("REDIS_URL not set, using in-memory reminder queue");
            Arc::new(InMemoryReminderQueue::new())
        }
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
