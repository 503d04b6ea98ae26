//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler owns a [`LedgerStore`](crate::application::ledger::LedgerStore)
//! and performs at most one batch per step.

pub mod entitlement;
pub mod leaderboard;
pub mod referral;
pub mod verification;

pub use entitlement::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use leaderboard::{
    GetLeaderboardHandler, GetLeaderboardQuery, PublishLeaderboardHandler,
    PublishLeaderboardResult, ResetWeeklyCountersHandler, ResetWeeklyCountersResult,
    RunLeaderboardActionCommand, RunLeaderboardActionHandler, RunLeaderboardActionResult,
};
pub use referral::{ApplyReferralBonusCommand, ApplyReferralBonusHandler, ApplyReferralBonusResult};
pub use verification::{
    IssueVerificationCodeCommand, IssueVerificationCodeHandler, IssueVerificationCodeResult,
};
