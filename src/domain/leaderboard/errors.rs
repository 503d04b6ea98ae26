//! Leaderboard error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::StoreError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaderboardError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid cycle phase: {0}")]
    InvalidPhase(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LeaderboardError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LeaderboardError::UnknownAction(_) => ErrorCode::UnknownAction,
            LeaderboardError::InvalidPhase(_) => ErrorCode::InternalError,
            LeaderboardError::Store(_) => ErrorCode::StoreError,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            LeaderboardError::UnknownAction(action) => {
                format!("Invalid action '{}'. Use 'reset' or 'update'", action)
            }
            LeaderboardError::InvalidPhase(_) => "Leaderboard cycle failed".to_string(),
            LeaderboardError::Store(_) => "Failed to update leaderboard".to_string(),
        }
    }
}

impl From<LeaderboardError> for DomainError {
    fn from(err: LeaderboardError) -> Self {
        DomainError::new(err.code(), err.public_message())
    }
}
