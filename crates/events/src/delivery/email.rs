//! Email delivery via SMTP.
//!
//! [`SmtpNotifier`] wraps the `lettre` async SMTP transport to send plain-text
//! guest emails. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and the
//! server falls back to the log-only channel.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, Notifier};
use crate::message::Notification;

/// Why an email could not be built or handed to the relay.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP relay failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not assemble message: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "reservations@innkeep.local";

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender mailbox, optionally with a display name.
    pub from_address: String,
    /// Relay login. Both halves must be set for authentication to be used.
    pub credentials: Option<(String, String)>,
}

impl EmailConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT` (default 587), `SMTP_FROM`,
    /// `SMTP_USER` and `SMTP_PASSWORD`.
    ///
    /// `None` when `SMTP_HOST` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let smtp_host = var("SMTP_HOST")?;
        let smtp_port = match var("SMTP_PORT").map(|p| p.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(_)) => {
                tracing::warn!(default = DEFAULT_SMTP_PORT, "SMTP_PORT is not a port number");
                DEFAULT_SMTP_PORT
            }
            None => DEFAULT_SMTP_PORT,
        };
        let credentials = var("SMTP_USER").zip(var("SMTP_PASSWORD"));

        Some(Self {
            smtp_host,
            smtp_port,
            from_address: var("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_owned()),
            credentials,
        })
    }
}

/// Sends guest notifications through an SMTP relay.
pub struct SmtpNotifier {
    config: EmailConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Build the transport once; connections are opened per send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let Some((user, pass)) = &config.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }
}

/// Assemble the plain-text MIME message for a notification.
pub fn build_message(from_address: &str, notification: &Notification) -> Result<Message, EmailError> {
    Message::builder()
        .from(from_address.parse()?)
        .to(notification.to.parse()?)
        .subject(notification.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let message = build_message(&self.config.from_address, notification)?;
        self.mailer.send(message).await.map_err(EmailError::from)?;

        tracing::info!(to = %notification.to, subject = %notification.subject, "Notification email sent");
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "smtp"
    }
}
