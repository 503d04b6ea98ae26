//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `account` - User ledger rows and referral codes
//! - `referral` - Referral bonus rules
//! - `leaderboard` - Weekly ranking and the reset/publish cycle
//! - `entitlement` - Payment webhooks and VIP entitlement
//! - `verification` - One-time email verification codes

pub mod account;
pub mod entitlement;
pub mod foundation;
pub mod leaderboard;
pub mod referral;
pub mod verification;
