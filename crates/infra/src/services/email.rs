use super::INotifier;
use crate::config::MailConfig;
use chaincal_domain::Event;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, warn};

const FALLBACK_RECIPIENT: &str = "user@example.com";

enum Transport {
    /// Reminders are logged instead of sent
    Console,
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    /// Neither console mode nor smtp credentials were configured, every send
    /// reports "not configured" without erroring
    Disabled,
}

pub struct MailService {
    transport: Transport,
    from: Option<String>,
    default_recipient: Option<String>,
}

impl MailService {
    pub fn new(config: &MailConfig) -> Self {
        let transport = Self::create_transport(config);

        Self {
            transport,
            from: config.smtp_from.clone().or_else(|| config.smtp_user.clone()),
            default_recipient: config.default_recipient.clone(),
        }
    }

    /// A notifier where every send is a no-op
    pub fn disabled() -> Self {
        Self {
            transport: Transport::Disabled,
            from: None,
            default_recipient: None,
        }
    }

    fn create_transport(config: &MailConfig) -> Transport {
        if config.console_mode {
            info!("Email service initialized in console mode");
            return Transport::Console;
        }

        let (user, pass) = match (&config.smtp_user, &config.smtp_pass) {
            (Some(user), Some(pass)) => (user.clone(), pass.clone()),
            _ => {
                warn!("SMTP credentials not configured, email service disabled");
                return Transport::Disabled;
            }
        };

        match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host) {
            Ok(builder) => {
                let transport = builder
                    .port(config.smtp_port)
                    .credentials(Credentials::new(user, pass))
                    .build();
                info!("Email service initialized with SMTP");
                Transport::Smtp(transport)
            }
            Err(e) => {
                error!("Failed to initialize SMTP transport: {:?}", e);
                Transport::Disabled
            }
        }
    }

    fn subject(event: &Event) -> String {
        format!("ChainCal Reminder: {}", event.event_name())
    }

    fn html_body(event: &Event) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <body>
    <h1>ChainCal Reminder</h1>
    <div>
      <div><strong>{}</strong></div>
      <div>Contract: {}</div>
      <div>Scheduled at (unix millis): {}</div>
      <div>Event ID: #{}</div>
    </div>
    <p>This is your scheduled reminder for the on-chain event above.</p>
  </body>
</html>"#,
            event.event_name(),
            event.contract_address_short(),
            event.next_timestamp,
            event.id
        )
    }
}

#[async_trait::async_trait]
impl INotifier for MailService {
    async fn send_reminder(&self, event: &Event, recipient: Option<&str>) -> bool {
        let recipient = recipient
            .map(|r| r.to_string())
            .or_else(|| self.default_recipient.clone())
            .unwrap_or_else(|| FALLBACK_RECIPIENT.to_string());

        match &self.transport {
            Transport::Disabled => {
                info!("Email service not configured, skipping reminder for event {}", event.id);
                false
            }
            Transport::Console => {
                info!(
                    "Email reminder (console mode) to {} for event {}: {} at contract {}",
                    recipient,
                    event.id,
                    event.event_name(),
                    event.contract_address
                );
                true
            }
            Transport::Smtp(transport) => {
                let from = match &self.from {
                    Some(from) => from,
                    None => {
                        error!("SMTP from address missing, unable to send reminder");
                        return false;
                    }
                };
                let message = Message::builder()
                    .from(match from.parse() {
                        Ok(mailbox) => mailbox,
                        Err(e) => {
                            error!("Invalid from address {}: {:?}", from, e);
                            return false;
                        }
                    })
                    .to(match recipient.parse() {
                        Ok(mailbox) => mailbox,
                        Err(e) => {
                            error!("Invalid recipient address {}: {:?}", recipient, e);
                            return false;
                        }
                    })
                    .subject(Self::subject(event))
                    .header(ContentType::TEXT_HTML)
                    .body(Self::html_body(event));

                let message = match message {
                    Ok(message) => message,
                    Err(e) => {
                        error!("Failed to build reminder email for event {}: {:?}", event.id, e);
                        return false;
                    }
                };

                match transport.send(message).await {
                    Ok(_) => {
                        info!("Reminder email sent for event {} to {}", event.id, recipient);
                        true
                    }
                    Err(e) => {
                        error!("Failed to send email for event {}: {:?}", event.id, e);
                        false
                    }
                }
            }
        }
    }

    async fn test_connection(&self) -> bool {
        match &self.transport {
            Transport::Disabled => false,
            Transport::Console => {
                info!("Email service connection verified (console mode)");
                true
            }
            Transport::Smtp(transport) => match transport.test_connection().await {
                Ok(ok) => {
                    if ok {
                        info!("Email service connection verified");
                    } else {
                        warn!("Email service connection could not be verified");
                    }
                    ok
                }
                Err(e) => {
                    error!("Email service connection failed: {:?}", e);
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn event() -> Event {
        Event {
            id: 7,
            contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
            event_signature: "Transfer(address,address,uint256)".into(),
            event_args: Default::default(),
            next_timestamp: 1_700_000_000_000,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn console_mode_reports_success() {
        let config = MailConfig {
            console_mode: true,
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            smtp_from: None,
            default_recipient: None,
        };
        let service = MailService::new(&config);
        assert!(service.test_connection().await);
        assert!(service.send_reminder(&event(), None).await);
    }

    #[tokio::test]
    async fn unconfigured_service_reports_not_sent() {
        let service = MailService::disabled();
        assert!(!service.test_connection().await);
        assert!(!service.send_reminder(&event(), Some("ops@example.com")).await);
    }

    #[test]
    fn renders_event_details_into_body() {
        let body = MailService::html_body(&event());
        assert!(body.contains("Transfer"));
        assert!(body.contains("0x1113...B1e4"));
        assert!(body.contains("#7"));
    }
}
