//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `ledger` is the typed store adapter every handler writes through.

pub mod handlers;
pub mod ledger;

pub use handlers::{
    ApplyReferralBonusCommand, ApplyReferralBonusHandler, ApplyReferralBonusResult,
    GetLeaderboardHandler, GetLeaderboardQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, HandlePaymentWebhookResult, IssueVerificationCodeCommand,
    IssueVerificationCodeHandler, IssueVerificationCodeResult, PublishLeaderboardHandler,
    ResetWeeklyCountersHandler, RunLeaderboardActionCommand, RunLeaderboardActionHandler,
    RunLeaderboardActionResult,
};
pub use ledger::LedgerStore;
