//! Admin API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

const MIN_KEY_LEN: usize = 16;

/// Shared bearer key for admin endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub api_key: SecretString,
}

impl AdminConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("ADMIN__API_KEY"));
        }
        if key.len() < MIN_KEY_LEN {
            return Err(ValidationError::AdminKeyTooShort(MIN_KEY_LEN));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> AdminConfig {
        AdminConfig {
            api_key: SecretString::new(key.to_string()),
        }
    }

    #[test]
    fn short_keys_are_rejected() {
        assert!(matches!(
            config("short").validate(),
            Err(ValidationError::AdminKeyTooShort(16))
        ));
        assert!(config("0123456789abcdef").validate().is_ok());
    }
}
