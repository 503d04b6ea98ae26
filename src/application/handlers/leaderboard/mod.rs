//! Leaderboard handlers.
//!
//! ## Commands
//! - Reset weekly counters
//! - Publish the ranking
//! - Run an admin action (`reset` or `update`)
//!
//! ## Queries
//! - Get the published ranking

mod get_leaderboard;
mod publish_leaderboard;
mod reset_weekly_counters;
mod run_leaderboard_action;

// Commands
pub use publish_leaderboard::{PublishLeaderboardHandler, PublishLeaderboardResult};
pub use reset_weekly_counters::{ResetWeeklyCountersHandler, ResetWeeklyCountersResult};
pub use run_leaderboard_action::{
    RunLeaderboardActionCommand, RunLeaderboardActionHandler, RunLeaderboardActionResult,
};

// Queries
pub use get_leaderboard::{GetLeaderboardHandler, GetLeaderboardQuery};
