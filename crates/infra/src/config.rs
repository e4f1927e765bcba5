use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret used to verify inbound webhook signatures.
    /// When missing, all webhook deliveries are rejected (fail closed).
    pub webhook_signing_key: Option<String>,
    /// Redis connection url for the reminder queue. When missing, the
    /// in-memory fallback queue is used.
    pub redis_url: Option<String>,
    /// Outbound mail configuration
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// When true, reminder emails are logged instead of sent
    pub console_mode: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// From address, falls back to `smtp_user`
    pub smtp_from: Option<String>,
    /// Recipient used when a reminder has no explicit recipient
    pub default_recipient: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let webhook_signing_key = match std::env::var("ALCHEMY_SIGNING_KEY") {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                warn!("ALCHEMY_SIGNING_KEY not set, inbound webhooks will be rejected");
                None
            }
        };

        let redis_url = std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty());

        let default_port = "3000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        Self {
            port,
            webhook_signing_key,
            redis_url,
            mail: MailConfig::new(),
        }
    }
}

impl MailConfig {
    pub fn new() -> Self {
        let console_mode = matches!(std::env::var("EMAIL_MODE").as_deref(), Ok("console"));
        if console_mode {
            info!("Email service will run in console mode, emails are logged instead of sent");
        }

        let smtp_port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(587);

        Self {
            console_mode,
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            smtp_port,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_pass: std::env::var("SMTP_PASS").ok(),
            smtp_from: std::env::var("SMTP_FROM").ok(),
            default_recipient: std::env::var("DEFAULT_EMAIL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self::new()
    }
}
