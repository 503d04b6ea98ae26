//! In-memory mail sender for testing and local runs.
//!
//! Records every message instead of delivering it, or only logs it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::ports::{MailError, MailSender, OutboundEmail};

#[derive(Default)]
pub struct InMemoryMailSender {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: AtomicBool,
    log_only: bool,
}

impl InMemoryMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails with a transport error.
    pub fn failing() -> Self {
        let sender = Self::default();
        sender.fail.store(true, Ordering::SeqCst);
        sender
    }

    /// A sender that logs each message and keeps nothing, for local runs.
    pub fn log_only() -> Self {
        Self {
            log_only: true,
            ..Self::default()
        }
    }

    // === Test Helpers ===

    /// Messages delivered so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .expect("InMemoryMailSender: sent lock poisoned")
            .clone()
    }
}

#[async_trait]
impl MailSender for InMemoryMailSender {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("simulated delivery failure".to_string()));
        }
        if self.log_only {
            tracing::info!(to = %email.to, subject = %email.subject, "Mail delivery disabled; message logged only");
            return Ok(());
        }
        tracing::debug!(to = %email.to, subject = %email.subject, "Recorded outbound email");
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("sent lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Rewards <noreply@example.com>".to_string(),
            to: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn records_sent_messages() {
        let sender = InMemoryMailSender::new();
        sender.send(email()).await.unwrap();
        assert_eq!(sender.sent(), vec![email()]);
    }

    #[tokio::test]
    async fn failing_sender_records_nothing() {
        let sender = InMemoryMailSender::failing();
        assert!(matches!(sender.send(email()).await, Err(MailError::Transport(_))));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn log_only_sender_keeps_nothing() {
        let sender = InMemoryMailSender::log_only();
        assert!(sender.send(email()).await.is_ok());
        assert!(sender.sent().is_empty());
    }
}
