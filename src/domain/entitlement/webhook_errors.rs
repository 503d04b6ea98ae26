//! Webhook error types for Paystack webhook handling.
//!
//! Status codes drive the sender's redelivery behavior:
//! - 2xx: acknowledged, no redelivery
//! - 4xx: rejected, no redelivery
//! - 5xx: server fault, Paystack redelivers

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::StoreError;

/// Errors that occur during webhook processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WebhookError {
    /// Signature missing, malformed or not matching the body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body is not a well-formed event.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from an otherwise handled event.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The referenced account does not exist yet.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl WebhookError {
    /// Returns true if the sender should redeliver.
    ///
    /// A missing account may be eventual consistency with signup, so it is
    /// treated like a store fault.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Store(_) | WebhookError::AccountNotFound(_))
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::AccountNotFound(_) | WebhookError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WebhookError::InvalidSignature => ErrorCode::InvalidSignature,
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => {
                ErrorCode::ValidationFailed
            }
            WebhookError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            WebhookError::Store(_) => ErrorCode::StoreError,
        }
    }
}

impl From<WebhookError> for DomainError {
    fn from(err: WebhookError) -> Self {
        let message = match &err {
            WebhookError::InvalidSignature => "Invalid signature",
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => "Malformed event",
            WebhookError::AccountNotFound(_) | WebhookError::Store(_) => "Processing failed",
        };
        DomainError::new(err.code(), message)
    }
}
