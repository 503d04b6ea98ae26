//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("In-memory store is not allowed in production")]
    InMemoryStoreInProduction,

    #[error("Invalid Paystack secret key format")]
    InvalidPaystackKey,

    #[error("VIP fee must be positive")]
    InvalidVipFee,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Referral bonus must be positive")]
    InvalidReferralBonus,

    #[error("Leaderboard size must be between 1 and 500")]
    InvalidLeaderboardSize,

    #[error("Verification code lifetime must be between 1 and 1440 minutes")]
    InvalidVerificationTtl,

    #[error("Admin API key must be at least {0} characters")]
    AdminKeyTooShort(usize),
}
