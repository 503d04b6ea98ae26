//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `REWARDS_LEDGER` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use rewards_ledger::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod admin;
mod database;
mod email;
mod error;
mod payment;
mod rewards;
mod server;

pub use admin::AdminConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use email::{EmailConfig, MailDelivery};
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use rewards::RewardsConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Paystack credentials and the VIP price
    pub payment: PaymentConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub rewards: RewardsConfig,

    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `REWARDS_LEDGER` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `REWARDS_LEDGER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REWARDS_LEDGER__PAYMENT__PAYSTACK_SECRET_KEY=...` -> `payment.paystack_secret_key`
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when a required variable is missing or a
    /// value cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REWARDS_LEDGER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// The first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.rewards.validate()?;
        self.admin.validate()?;

        if self.is_production() && self.database.backend == StoreBackend::Memory {
            return Err(ValidationError::InMemoryStoreInProduction);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
