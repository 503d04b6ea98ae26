//! Referral domain module.
//!
//! A referral links a new signup to the account whose referral code they
//! entered. Only the referrer is credited here; the new user's welcome
//! credit belongs to onboarding.

mod errors;

pub use errors::ReferralError;

/// Coins credited to the referrer when no override is configured.
pub const DEFAULT_REFERRAL_BONUS: u32 = 100;
