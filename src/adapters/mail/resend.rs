//! Resend mail adapter.
//!
//! Implements the `MailSender` port against the Resend HTTP API.
//!
//! # Configuration
//!
//! ```ignore
//! let sender = ResendMailSender::new(ResendConfig::new(api_key));
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{MailError, MailSender, OutboundEmail};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Resend mail sender.
pub struct ResendMailSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMailSender {
    /// # Errors
    ///
    /// `Transport` if the HTTP client cannot be built.
    pub fn new(config: ResendConfig) -> Result<Self, MailError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MailSender for ResendMailSender {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let body = SendEmailRequest {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Resend rejected email");
            return Err(MailError::Rejected(format!("status {}", status)));
        }

        tracing::debug!(subject = %email.subject, "Email accepted by Resend");
        Ok(())
    }
}
