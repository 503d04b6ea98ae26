//! Background jobs.
//!
//! - `LeaderboardScheduler` - periodic weekly reset and republish

mod leaderboard_scheduler;

pub use leaderboard_scheduler::LeaderboardScheduler;
