//! ApplyReferralBonusHandler - credits the owner of a referral code.

use crate::application::ledger::LedgerStore;
use crate::domain::account::{fields, ReferralCode};
use crate::domain::foundation::UserId;
use crate::domain::referral::ReferralError;
use crate::ports::{FieldUpdate, WriteBatch};

/// Command to credit a referral.
#[derive(Debug, Clone)]
pub struct ApplyReferralBonusCommand {
    pub new_user_id: String,
    pub referral_code: String,
}

/// Result of a credited referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReferralBonusResult {
    pub referrer_id: UserId,
    pub new_user_id: UserId,
    pub bonus: u32,
}

/// Handler for referral signups.
///
/// Only the referrer is credited. The lookup and the increment are not
/// isolated from concurrent writers; concurrent credits to the same
/// referrer are increments and commute.
pub struct ApplyReferralBonusHandler {
    ledger: LedgerStore,
    bonus: u32,
}

impl ApplyReferralBonusHandler {
    pub fn new(ledger: LedgerStore, bonus: u32) -> Self {
        Self { ledger, bonus }
    }

    pub async fn handle(
        &self,
        cmd: ApplyReferralBonusCommand,
    ) -> Result<ApplyReferralBonusResult, ReferralError> {
        // 1. Validate input
        let new_user_id = UserId::new(cmd.new_user_id)?;
        let code = ReferralCode::parse(&cmd.referral_code)?;

        // 2. Find the referrer
        let candidates = self.ledger.find_accounts_by_referral_code(&code).await?;
        if candidates.len() > 1 {
            tracing::warn!(
                referral_code = %code,
                matches = candidates.len(),
                "Referral code is shared by several accounts, using the first"
            );
        }
        let referrer = candidates
            .into_iter()
            .next()
            .ok_or(ReferralError::InvalidCode)?;

        // 3. A user can never refer themselves
        if referrer.id == new_user_id {
            tracing::warn!(user_id = %new_user_id, "Self-referral rejected");
            return Err(ReferralError::SelfReferral);
        }

        // 4. Credit the referrer in one batch
        let path = LedgerStore::user_path(&referrer.id)?;
        let mut batch = WriteBatch::new();
        batch.update(
            path,
            vec![(
                fields::COINS.to_string(),
                FieldUpdate::Increment(i64::from(self.bonus)),
            )],
        );

        if let Err(e) = self.ledger.commit(batch).await {
            tracing::error!(
                referrer_id = %referrer.id,
                new_user_id = %new_user_id,
                error = %e,
                "Failed to apply referral bonus"
            );
            return Err(e.into());
        }

        tracing::info!(
            referrer_id = %referrer.id,
            new_user_id = %new_user_id,
            bonus = self.bonus,
            "Referral bonus applied"
        );

        Ok(ApplyReferralBonusResult {
            referrer_id: referrer.id,
            new_user_id,
            bonus: self.bonus,
        })
    }
}
