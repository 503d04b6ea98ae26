//! Paystack webhook signature verification.
//!
//! Paystack signs the raw request body with HMAC-SHA512 keyed by the account
//! secret key and sends the lowercase hex digest in `x-paystack-signature`.
//! Verification runs before the body is parsed and before any store access.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::payment_event::PaystackEvent;
use super::webhook_errors::WebhookError;

type HmacSha512 = Hmac<Sha512>;

/// Verifier for Paystack webhook signatures.
pub struct PaystackSignatureVerifier {
    secret: SecretString,
}

impl PaystackSignatureVerifier {
    /// Creates a new verifier with the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Checks `signature_hex` against the HMAC of the exact payload bytes.
    ///
    /// # Errors
    ///
    /// `InvalidSignature` when the header is not hex or the digest differs.
    pub fn verify(&self, payload: &[u8], signature_hex: &str) -> Result<(), WebhookError> {
        let provided =
            hex::decode(signature_hex.trim()).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = compute_signature(self.secret.expose_secret().as_bytes(), payload);

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }

    /// Verifies the signature, then decodes the envelope.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature verification failed
    /// - `ParseError` - payload is not a JSON event envelope
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_hex: &str,
    ) -> Result<PaystackEvent, WebhookError> {
        self.verify(payload, signature_hex)?;

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

/// Hex HMAC-SHA512 of `payload` under `secret`, as Paystack sends it.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    hex::encode(compute_signature(secret.as_bytes(), payload))
}

fn compute_signature(secret: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC accepts any key");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison; only the length check short-circuits.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
