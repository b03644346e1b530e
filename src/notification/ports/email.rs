//! Outbound email port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Best-effort email transport.
///
/// Success means transport-level acknowledgment only; there is no delivery
/// confirmation, and callers treat failures as log-and-continue.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends a plain-text message.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the transport rejects or cannot reach
    /// the relay.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Transport-level email failure.
#[derive(Debug, Clone, Error)]
pub enum EmailError {
    /// The recipient address could not be parsed.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The transport failed to hand the message off.
    #[error("email transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmailError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
