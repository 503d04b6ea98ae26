//! Applied-payment ledger and the VIP fee predicate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::payment_event::{VipCharge, VIP_PAYMENT_TYPE};

/// Collection keyed by payment reference.
pub const PAYMENTS_COLLECTION: &str = "payments";

/// VIP subscription price when none is configured.
pub const DEFAULT_VIP_FEE_NAIRA: u64 = 5000;

/// The VIP subscription price in whole naira.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VipFee {
    naira: u64,
}

impl VipFee {
    pub fn new(naira: u64) -> Self {
        Self { naira }
    }

    pub fn naira(&self) -> u64 {
        self.naira
    }

    /// Whether a charge of `amount_minor` kobo pays the fee.
    ///
    /// Paystack amounts are kobo; whole naira are compared, so fractional
    /// kobo below the fee never round up into it.
    pub fn is_covered_by(&self, amount_minor: u64) -> bool {
        amount_minor / 100 >= self.naira
    }
}

impl Default for VipFee {
    fn default() -> Self {
        Self::new(DEFAULT_VIP_FEE_NAIRA)
    }
}

/// One applied payment, written in the same batch as its effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub reference: String,
    pub user_id: String,
    /// Minor units, as received.
    pub amount: u64,
    pub payment_type: String,
    pub applied_at: Timestamp,
}

impl PaymentRecord {
    pub fn for_vip_charge(charge: &VipCharge, applied_at: Timestamp) -> Self {
        Self {
            reference: charge.reference.as_str().to_string(),
            user_id: charge.user_id.as_str().to_string(),
            amount: charge.amount_minor,
            payment_type: VIP_PAYMENT_TYPE.to_string(),
            applied_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PaymentReference, UserId};

    #[test]
    fn default_fee_is_five_thousand_naira() {
        assert_eq!(VipFee::default().naira(), 5000);
    }

    #[test]
    fn exact_fee_is_covered() {
        assert!(VipFee::default().is_covered_by(500_000));
        assert!(VipFee::default().is_covered_by(750_000));
    }

    #[test]
    fn short_by_one_naira_is_not_covered() {
        assert!(!VipFee::default().is_covered_by(499_900));
    }

    #[test]
    fn fractional_kobo_below_fee_is_not_covered() {
        assert!(!VipFee::default().is_covered_by(499_999));
    }

    #[test]
    fn record_copies_charge_fields() {
        let charge = VipCharge {
            user_id: UserId::new("U1").unwrap(),
            reference: PaymentReference::new("ref_9").unwrap(),
            amount_minor: 500_000,
        };
        let now = Timestamp::now();
        let record = PaymentRecord::for_vip_charge(&charge, now);

        assert_eq!(record.reference, "ref_9");
        assert_eq!(record.payment_type, "vip_subscription");
        assert_eq!(record.user_id, "U1");
        assert_eq!(record.amount, 500_000);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = PaymentRecord {
            reference: "r".to_string(),
            user_id: "U1".to_string(),
            amount: 1,
            payment_type: "vip_subscription".to_string(),
            applied_at: Timestamp::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("paymentType").is_some());
        assert!(value.get("appliedAt").is_some());
    }
}
