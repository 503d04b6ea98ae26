//! HTTP adapters - REST API implementations.

pub mod middleware;
pub mod rewards;

pub use rewards::{rewards_router, RewardsAppState, RewardsSettings};
