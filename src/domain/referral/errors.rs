//! Referral-specific error types.
//!
//! | Error | Outcome |
//! |-------|---------|
//! | Validation | 400, not retried |
//! | InvalidCode | business false |
//! | SelfReferral | business false |
//! | Store | 500, caller may re-invoke |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::StoreError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferralError {
    #[error("Invalid referral request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid referral code")]
    InvalidCode,

    #[error("You cannot use your own referral code")]
    SelfReferral,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ReferralError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReferralError::Validation(_) => ErrorCode::ValidationFailed,
            ReferralError::InvalidCode => ErrorCode::InvalidReferralCode,
            ReferralError::SelfReferral => ErrorCode::SelfReferral,
            ReferralError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// Message safe to show to the caller. Store details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ReferralError::Store(_) => "Failed to apply referral bonus".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ReferralError> for DomainError {
    fn from(err: ReferralError) -> Self {
        DomainError::new(err.code(), err.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_details_are_not_exposed() {
        let err = ReferralError::Store(StoreError::backend("pg: connection reset by 10.0.0.3"));
        assert_eq!(err.public_message(), "Failed to apply referral bonus");
        assert_eq!(err.code(), ErrorCode::StoreError);
    }

    #[test]
    fn business_errors_keep_their_message() {
        assert_eq!(ReferralError::InvalidCode.public_message(), "Invalid referral code");
        let domain: DomainError = ReferralError::SelfReferral.into();
        assert_eq!(domain.code, ErrorCode::SelfReferral);
    }
}
