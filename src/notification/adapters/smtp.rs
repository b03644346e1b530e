//! SMTP email adapter backed by `lettre`.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};

use crate::notification::ports::{EmailError, EmailSender};

/// SMTP relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay port; 587 submits over STARTTLS.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Account used to authenticate and as the envelope sender.
    pub sender_address: String,
    /// Account password or app token.
    pub password: String,
    /// Display name used in the `From` header.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

const fn default_port() -> u16 {
    587
}

fn default_sender_name() -> String {
    "Task Management".to_owned()
}

/// Email sender that relays plain-text mail through an SMTP submission
/// endpoint.
#[derive(Clone)]
pub struct SmtpEmailSender {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    /// Builds a sender for the configured relay.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Transport`] when the relay parameters are
    /// rejected.
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        let credentials =
            Credentials::new(config.sender_address.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(EmailError::transport)?
            .port(config.port)
            .credentials(credentials)
            .build();
        Ok(Self { config, transport })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let from: Mailbox = format!(
            "{} <{}>",
            self.config.sender_name, self.config.sender_address
        )
        .parse()
        .map_err(|_| EmailError::InvalidAddress(self.config.sender_address.clone()))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())
            .map_err(EmailError::transport)?;

        self.transport
            .send(message)
            .await
            .map_err(EmailError::transport)?;
        Ok(())
    }
}
