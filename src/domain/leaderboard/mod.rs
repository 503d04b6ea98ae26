//! Leaderboard domain module.
//!
//! Weekly ranking by `weeklyCoins`, published as a replace-all collection.
//!
//! - `entry` - public ranking rows
//! - `ranking` - dense rank assignment
//! - `phase` - reset/publish cycle state machine
//! - `action` - admin action parsing

mod action;
mod entry;
mod errors;
mod phase;
mod ranking;

pub use action::LeaderboardAction;
pub use entry::{LeaderboardEntry, LeaderboardUser};
pub use errors::LeaderboardError;
pub use phase::CyclePhase;
pub use ranking::rank_accounts;

/// Collection holding the published ranking.
pub const LEADERBOARD_COLLECTION: &str = "leaderboard";

/// Number of accounts published when no override is configured.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 50;
