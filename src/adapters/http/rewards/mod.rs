//! HTTP adapter for the rewards ledger endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{
    RewardsApiError, RewardsAppState, RewardsSettings, FALLBACK_SIGNATURE_HEADER,
    PAYSTACK_SIGNATURE_HEADER,
};
pub use routes::{rewards_router, rewards_routes};
