//! Transactional mail port.
//!
//! The core only needs a single send call. Retry policy belongs to the
//! provider; a failure is reported back to the caller unchanged.

use async_trait::async_trait;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Errors that can occur while handing a message to the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("Mail provider rejected the message: {0}")]
    Rejected(String),

    #[error("Mail provider unreachable: {0}")]
    Transport(String),
}

/// Port for sending transactional email.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}
