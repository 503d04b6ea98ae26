//! Paystack event envelope and the intents the ledger acts on.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::foundation::{PaymentReference, UserId};

use super::webhook_errors::WebhookError;

pub const CHARGE_SUCCESS: &str = "charge.success";
pub const DEDICATED_ACCOUNT_ASSIGNED: &str = "dedicatedaccount.assign.success";
pub const VIP_PAYMENT_TYPE: &str = "vip_subscription";

/// Raw webhook envelope. `data` is decoded per event type.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
struct ChargeData {
    amount: u64,
    #[serde(default)]
    reference: String,
    #[serde(default, deserialize_with = "lenient_metadata")]
    metadata: Option<ChargeMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ChargeMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    payment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DedicatedAccountData {
    customer: DvaCustomer,
    dedicated_account: DvaAccount,
}

#[derive(Debug, Deserialize)]
struct DvaCustomer {
    email: String,
}

#[derive(Debug, Deserialize)]
struct DvaAccount {
    account_number: String,
    bank: DvaBank,
}

#[derive(Debug, Deserialize)]
struct DvaBank {
    name: String,
}

/// Paystack sends `"metadata": ""` when a charge carries none.
fn lenient_metadata<'de, D>(deserializer: D) -> Result<Option<ChargeMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A successful VIP subscription charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VipCharge {
    pub user_id: UserId,
    pub reference: PaymentReference,
    /// Amount in minor units (kobo).
    pub amount_minor: u64,
}

/// A dedicated virtual account assigned to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedicatedAccount {
    pub customer_email: String,
    pub bank_name: String,
    pub account_number: String,
}

/// What a well-formed event asks the ledger to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentIntent {
    VipSubscription(VipCharge),
    DedicatedAccountAssigned(DedicatedAccount),
    /// Acknowledge without mutation.
    Unhandled { event: String, reason: &'static str },
}

impl PaystackEvent {
    /// Classifies the event.
    ///
    /// # Errors
    ///
    /// - `ParseError` when `data` does not match the shape of a handled event
    /// - `MissingField` when a handled charge lacks its reference
    pub fn intent(&self) -> Result<PaymentIntent, WebhookError> {
        match self.event.as_str() {
            CHARGE_SUCCESS => self.charge_intent(),
            DEDICATED_ACCOUNT_ASSIGNED => self.dedicated_account_intent(),
            _ => Ok(self.unhandled("event type not handled")),
        }
    }

    fn charge_intent(&self) -> Result<PaymentIntent, WebhookError> {
        let data: ChargeData = serde_json::from_value(self.data.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;
        let metadata = data.metadata.unwrap_or_default();

        if metadata.payment_type.as_deref() != Some(VIP_PAYMENT_TYPE) {
            return Ok(self.unhandled("payment type is not a VIP subscription"));
        }
        let user_id = match metadata.user_id.and_then(|id| UserId::new(id).ok()) {
            Some(id) => id,
            None => return Ok(self.unhandled("metadata has no user_id")),
        };
        let reference = PaymentReference::new(data.reference)
            .map_err(|_| WebhookError::MissingField("reference"))?;

        Ok(PaymentIntent::VipSubscription(VipCharge {
            user_id,
            reference,
            amount_minor: data.amount,
        }))
    }

    fn dedicated_account_intent(&self) -> Result<PaymentIntent, WebhookError> {
        let data: DedicatedAccountData = serde_json::from_value(self.data.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let customer_email = data.customer.email.trim().to_string();
        if customer_email.is_empty() {
            return Err(WebhookError::MissingField("customer.email"));
        }

        Ok(PaymentIntent::DedicatedAccountAssigned(DedicatedAccount {
            customer_email,
            bank_name: data.dedicated_account.bank.name,
            account_number: data.dedicated_account.account_number,
        }))
    }

    fn unhandled(&self, reason: &'static str) -> PaymentIntent {
        PaymentIntent::Unhandled {
            event: self.event.clone(),
            reason,
        }
    }
}
