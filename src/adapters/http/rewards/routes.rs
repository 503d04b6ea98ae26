//! Axum router configuration for the rewards endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    apply_referral, get_leaderboard, handle_paystack_webhook, health, issue_verification_code,
    run_leaderboard_action, RewardsAppState,
};

/// Create the rewards API router, mounted under `/api`.
///
/// # Routes
///
/// ## Public
/// - `POST /referrals` - Credit a referrer
/// - `POST /verification-codes` - Issue a signup code
/// - `GET /leaderboard` - Current ranking
///
/// ## Admin (bearer admin key)
/// - `POST /admin/leaderboard` - `reset` or `update`
///
/// ## Webhooks (signature verified)
/// - `POST /webhooks/paystack` - Paystack events
pub fn rewards_routes() -> Router<RewardsAppState> {
    Router::new()
        .route("/referrals", post(apply_referral))
        .route("/verification-codes", post(issue_verification_code))
        .route("/leaderboard", get(get_leaderboard))
        .route("/admin/leaderboard", post(run_leaderboard_action))
        .route("/webhooks/paystack", post(handle_paystack_webhook))
}

/// Complete application router with state applied.
///
/// Cross-cutting layers (tracing, CORS, timeouts) are added by the binary.
pub fn rewards_router(state: RewardsAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", rewards_routes())
        .with_state(state)
}
