//! Referral handlers.

mod apply_referral_bonus;

pub use apply_referral_bonus::{
    ApplyReferralBonusCommand, ApplyReferralBonusHandler, ApplyReferralBonusResult,
};
