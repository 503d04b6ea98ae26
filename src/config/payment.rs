//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::entitlement::{VipFee, DEFAULT_VIP_FEE_NAIRA};

use super::error::ValidationError;

/// Payment configuration (Paystack)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Paystack secret key. Paystack signs webhooks with it as well.
    pub paystack_secret_key: SecretString,

    /// VIP subscription price in whole naira
    #[serde(default = "default_vip_fee_naira")]
    pub vip_fee_naira: u64,
}

impl PaymentConfig {
    pub fn vip_fee(&self) -> VipFee {
        VipFee::new(self.vip_fee_naira)
    }

    pub fn is_test_mode(&self) -> bool {
        self.paystack_secret_key.expose_secret().starts_with("sk_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.paystack_secret_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PAYSTACK_SECRET_KEY"));
        }
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidPaystackKey);
        }
        if self.vip_fee_naira == 0 {
            return Err(ValidationError::InvalidVipFee);
        }
        Ok(())
    }
}

fn default_vip_fee_naira() -> u64 {
    DEFAULT_VIP_FEE_NAIRA
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> PaymentConfig {
        PaymentConfig {
            paystack_secret_key: SecretString::new(key.to_string()),
            vip_fee_naira: default_vip_fee_naira(),
        }
    }

    #[test]
    fn default_fee_is_five_thousand() {
        assert_eq!(config("sk_test_x").vip_fee().naira(), 5000);
    }

    #[test]
    fn key_prefix_is_checked() {
        assert!(config("sk_test_abc").validate().is_ok());
        assert!(matches!(config("pk_test_abc").validate(), Err(ValidationError::InvalidPaystackKey)));
        assert!(matches!(config("").validate(), Err(ValidationError::MissingRequired(_))));
    }

    #[test]
    fn test_mode_detection() {
        assert!(config("sk_test_abc").is_test_mode());
        assert!(!config("sk_live_abc").is_test_mode());
    }

    #[test]
    fn debug_output_redacts_key() {
        let rendered = format!("{:?}", config("sk_live_very_secret"));
        assert!(!rendered.contains("very_secret"));
    }
}
