//! HandlePaymentWebhookHandler - applies Paystack events to the ledger.

use std::sync::Arc;

use serde_json::json;

use crate::application::ledger::{to_fields, LedgerStore};
use crate::domain::account::fields;
use crate::domain::entitlement::{
    DedicatedAccount, PaymentIntent, PaymentRecord, PaystackSignatureVerifier, VipCharge, VipFee,
    WebhookError,
};
use crate::domain::foundation::{PaymentReference, Timestamp, UserId};
use crate::ports::{FieldUpdate, WriteBatch};

/// Command carrying one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, if any was sent.
    pub signature: Option<String>,
}

/// Result of webhook processing. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// VIP entitlement granted and the payment recorded.
    VipGranted {
        user_id: UserId,
        reference: PaymentReference,
    },
    /// The reference was already applied; nothing written.
    AlreadyApplied { reference: PaymentReference },
    /// Charge smaller than the VIP fee; nothing written.
    AmountBelowFee {
        user_id: UserId,
        amount_minor: u64,
    },
    /// Dedicated account details stored on the matching user.
    DedicatedAccountLinked { user_id: UserId },
    /// Dedicated account event with no matching user.
    DedicatedAccountUnmatched,
    /// Event type or payment type this service does not act on.
    Ignored { event: String },
}

/// Handler for Paystack webhook deliveries.
///
/// The signature is verified before the body is parsed and before any store
/// access. Paystack delivers at least once; the payment reference makes the
/// VIP grant apply exactly once.
pub struct HandlePaymentWebhookHandler {
    ledger: LedgerStore,
    verifier: Arc<PaystackSignatureVerifier>,
    fee: VipFee,
}

impl HandlePaymentWebhookHandler {
    pub fn new(ledger: LedgerStore, verifier: Arc<PaystackSignatureVerifier>, fee: VipFee) -> Self {
        Self {
            ledger,
            verifier,
            fee,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Authenticate and parse
        let signature = cmd.signature.as_deref().unwrap_or_default();
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|e| {
                if e == WebhookError::InvalidSignature {
                    tracing::warn!(
                        has_signature = cmd.signature.is_some(),
                        "Rejected webhook with invalid signature"
                    );
                }
                e
            })?;

        // 2. Dispatch on intent
        match event.intent()? {
            PaymentIntent::VipSubscription(charge) => self.handle_vip_charge(charge).await,
            PaymentIntent::DedicatedAccountAssigned(account) => {
                self.handle_dedicated_account(account).await
            }
            PaymentIntent::Unhandled { event, reason } => {
                tracing::info!(event = %event, reason, "Webhook acknowledged without action");
                Ok(HandlePaymentWebhookResult::Ignored { event })
            }
        }
    }

    async fn handle_vip_charge(
        &self,
        charge: VipCharge,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        if !self.fee.is_covered_by(charge.amount_minor) {
            tracing::warn!(
                user_id = %charge.user_id,
                reference = %charge.reference,
                amount_minor = charge.amount_minor,
                fee_naira = self.fee.naira(),
                "VIP payment below fee, entitlement not granted"
            );
            return Ok(HandlePaymentWebhookResult::AmountBelowFee {
                user_id: charge.user_id,
                amount_minor: charge.amount_minor,
            });
        }

        if let Some(record) = self.ledger.get_payment_record(&charge.reference).await? {
            tracing::info!(
                reference = %charge.reference,
                user_id = %record.user_id,
                "Payment already applied, acknowledging redelivery"
            );
            return Ok(HandlePaymentWebhookResult::AlreadyApplied {
                reference: charge.reference,
            });
        }

        if self.ledger.get_account(&charge.user_id).await?.is_none() {
            tracing::error!(
                user_id = %charge.user_id,
                reference = %charge.reference,
                "VIP payment for unknown account"
            );
            return Err(WebhookError::AccountNotFound(charge.user_id.to_string()));
        }

        let user_path = LedgerStore::user_path(&charge.user_id)?;
        let payment_path = LedgerStore::payment_path(&charge.reference)?;
        let record = PaymentRecord::for_vip_charge(&charge, Timestamp::now());

        let mut batch = WriteBatch::new();
        batch
            .update(
                user_path,
                vec![(fields::IS_VIP.to_string(), FieldUpdate::Set(json!(true)))],
            )
            .set(payment_path.clone(), to_fields(&payment_path, &record)?);

        if let Err(e) = self.ledger.commit(batch).await {
            tracing::error!(
                user_id = %charge.user_id,
                reference = %charge.reference,
                error = %e,
                "Failed to grant VIP entitlement"
            );
            return Err(e.into());
        }

        tracing::info!(
            user_id = %charge.user_id,
            reference = %charge.reference,
            amount_minor = charge.amount_minor,
            "VIP entitlement granted"
        );
        Ok(HandlePaymentWebhookResult::VipGranted {
            user_id: charge.user_id,
            reference: charge.reference,
        })
    }

    async fn handle_dedicated_account(
        &self,
        account: DedicatedAccount,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let matches = self
            .ledger
            .find_accounts_by_email(&account.customer_email)
            .await?;
        if matches.len() > 1 {
            tracing::warn!(
                matches = matches.len(),
                "Several accounts share the customer email, using the first"
            );
        }
        let user = match matches.into_iter().next() {
            Some(user) => user,
            None => {
                tracing::warn!("Dedicated account assigned to unknown customer email");
                return Ok(HandlePaymentWebhookResult::DedicatedAccountUnmatched);
            }
        };

        let mut batch = WriteBatch::new();
        batch.update(
            LedgerStore::user_path(&user.id)?,
            vec![
                (
                    fields::DVA_BANK_NAME.to_string(),
                    FieldUpdate::Set(json!(account.bank_name)),
                ),
                (
                    fields::DVA_ACCOUNT_NUMBER.to_string(),
                    FieldUpdate::Set(json!(account.account_number)),
                ),
            ],
        );

        if let Err(e) = self.ledger.commit(batch).await {
            tracing::error!(user_id = %user.id, error = %e, "Failed to store dedicated account");
            return Err(e.into());
        }

        tracing::info!(user_id = %user.id, "Dedicated account linked");
        Ok(HandlePaymentWebhookResult::DedicatedAccountLinked { user_id: user.id })
    }
}
