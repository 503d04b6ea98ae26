//! Verification issuance errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{MailError, StoreError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    #[error("Missing required field: {0}")]
    MissingFields(&'static str),

    /// Nothing was persisted and no mail was sent.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The code was persisted but the mail was not delivered.
    #[error("Mail delivery failed: {0}")]
    MailDelivery(#[from] MailError),
}

impl VerificationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VerificationError::MissingFields(_) => ErrorCode::MissingFields,
            VerificationError::Store(_) => ErrorCode::StoreError,
            VerificationError::MailDelivery(_) => ErrorCode::PartialSideEffect,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            VerificationError::MissingFields(_) => "Missing required fields".to_string(),
            VerificationError::Store(_) | VerificationError::MailDelivery(_) => {
                "Failed to send verification code".to_string()
            }
        }
    }
}

impl From<VerificationError> for DomainError {
    fn from(err: VerificationError) -> Self {
        DomainError::new(err.code(), err.public_message())
    }
}
