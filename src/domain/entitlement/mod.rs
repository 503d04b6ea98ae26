//! Entitlement domain module.
//!
//! Paystack webhook authentication, event classification and the VIP fee
//! predicate. Each applied payment is recorded under its reference so that
//! redeliveries are acknowledged without a second write.

mod payment_event;
mod payment_record;
mod webhook_errors;
mod webhook_verifier;

pub use payment_event::{
    DedicatedAccount, PaymentIntent, PaystackEvent, VipCharge, CHARGE_SUCCESS,
    DEDICATED_ACCOUNT_ASSIGNED, VIP_PAYMENT_TYPE,
};
pub use payment_record::{PaymentRecord, VipFee, DEFAULT_VIP_FEE_NAIRA, PAYMENTS_COLLECTION};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, PaystackSignatureVerifier};
