//! HTTP handlers for the rewards endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::http::middleware::{AdminKey, RequireAdmin};
use crate::application::handlers::{
    ApplyReferralBonusHandler, GetLeaderboardHandler, GetLeaderboardQuery,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, IssueVerificationCodeHandler,
    PublishLeaderboardHandler, ResetWeeklyCountersHandler, RunLeaderboardActionCommand,
    RunLeaderboardActionHandler,
};
use crate::application::ledger::LedgerStore;
use crate::config::AppConfig;
use crate::domain::entitlement::{PaystackSignatureVerifier, VipFee, WebhookError};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::leaderboard::{LeaderboardError, DEFAULT_LEADERBOARD_SIZE};
use crate::domain::referral::{ReferralError, DEFAULT_REFERRAL_BONUS};
use crate::domain::verification::{VerificationError, DEFAULT_CODE_TTL_MINUTES};
use crate::ports::MailSender;

use super::dto::{
    ApplyReferralRequest, IssueVerificationCodeRequest, LeaderboardActionRequest,
    LeaderboardActionResponse, LeaderboardResponse, StatusResponse,
};

/// Signature header Paystack sends.
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";
/// Bare header accepted from older senders.
pub const FALLBACK_SIGNATURE_HEADER: &str = "signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Tunables the processors read on every request.
#[derive(Debug, Clone)]
pub struct RewardsSettings {
    pub referral_bonus: u32,
    pub leaderboard_size: usize,
    pub vip_fee: VipFee,
    pub verification_ttl_minutes: i64,
    /// `From` header on verification mail.
    pub mail_from: String,
}

impl RewardsSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            referral_bonus: config.rewards.referral_bonus,
            leaderboard_size: config.rewards.leaderboard_size,
            vip_fee: config.payment.vip_fee(),
            verification_ttl_minutes: config.rewards.verification_ttl_minutes,
            mail_from: config.email.from_header(),
        }
    }
}

impl Default for RewardsSettings {
    fn default() -> Self {
        Self {
            referral_bonus: DEFAULT_REFERRAL_BONUS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            vip_fee: VipFee::default(),
            verification_ttl_minutes: DEFAULT_CODE_TTL_MINUTES,
            mail_from: "Rewards <noreply@rewards.example.com>".to_string(),
        }
    }
}

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is an `Arc` handle.
#[derive(Clone)]
pub struct RewardsAppState {
    pub ledger: LedgerStore,
    pub mailer: Arc<dyn MailSender>,
    pub webhook_verifier: Arc<PaystackSignatureVerifier>,
    pub admin_key: AdminKey,
    pub settings: RewardsSettings,
}

impl RewardsAppState {
    pub fn new(
        ledger: LedgerStore,
        mailer: Arc<dyn MailSender>,
        paystack_secret: &SecretString,
        admin_key: SecretString,
        settings: RewardsSettings,
    ) -> Self {
        Self {
            ledger,
            mailer,
            webhook_verifier: Arc::new(PaystackSignatureVerifier::new(
                paystack_secret.expose_secret().as_str(),
            )),
            admin_key: AdminKey::new(admin_key),
            settings,
        }
    }

    pub fn from_config(config: &AppConfig, ledger: LedgerStore, mailer: Arc<dyn MailSender>) -> Self {
        Self::new(
            ledger,
            mailer,
            &config.payment.paystack_secret_key,
            config.admin.api_key.clone(),
            RewardsSettings::from_config(config),
        )
    }

    /// Create handlers on demand from the shared state.
    pub fn referral_handler(&self) -> ApplyReferralBonusHandler {
        ApplyReferralBonusHandler::new(self.ledger.clone(), self.settings.referral_bonus)
    }

    pub fn leaderboard_action_handler(&self) -> RunLeaderboardActionHandler {
        RunLeaderboardActionHandler::new(
            ResetWeeklyCountersHandler::new(self.ledger.clone()),
            PublishLeaderboardHandler::new(self.ledger.clone(), self.settings.leaderboard_size),
        )
    }

    pub fn get_leaderboard_handler(&self) -> GetLeaderboardHandler {
        GetLeaderboardHandler::new(self.ledger.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.ledger.clone(),
            self.webhook_verifier.clone(),
            self.settings.vip_fee,
        )
    }

    pub fn verification_handler(&self) -> IssueVerificationCodeHandler {
        IssueVerificationCodeHandler::new(
            self.ledger.clone(),
            self.mailer.clone(),
            self.settings.mail_from.clone(),
            self.settings.verification_ttl_minutes,
        )
    }
}

impl FromRef<RewardsAppState> for AdminKey {
    fn from_ref(state: &RewardsAppState) -> Self {
        state.admin_key.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/referrals - Credit the owner of a referral code
pub async fn apply_referral(
    State(state): State<RewardsAppState>,
    payload: Result<Json<ApplyReferralRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RewardsApiError> {
    let Json(request) = payload?;

    let result = state.referral_handler().handle(request.into()).await?;

    Ok(Json(StatusResponse::ok(format!(
        "Referral bonus of {} coins applied",
        result.bonus
    ))))
}

/// POST /api/admin/leaderboard - Reset weekly coins and/or republish the ranking
pub async fn run_leaderboard_action(
    State(state): State<RewardsAppState>,
    _admin: RequireAdmin,
    payload: Result<Json<LeaderboardActionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RewardsApiError> {
    let Json(request) = payload?;

    let cmd = RunLeaderboardActionCommand {
        action: request.action,
    };
    let result = state.leaderboard_action_handler().handle(cmd).await?;

    Ok(Json(LeaderboardActionResponse::from(result)))
}

/// POST /api/webhooks/paystack - Handle Paystack webhook events
///
/// The body is taken as raw bytes; the signature covers the exact bytes sent.
pub async fn handle_paystack_webhook(
    State(state): State<RewardsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, RewardsApiError> {
    let signature = headers
        .get(PAYSTACK_SIGNATURE_HEADER)
        .or_else(|| headers.get(FALLBACK_SIGNATURE_HEADER))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };
    let result = state.webhook_handler().handle(cmd).await?;
    tracing::debug!(?result, "Webhook acknowledged");

    Ok(Json(StatusResponse::ok("Webhook processed")))
}

/// POST /api/verification-codes - Issue and email a signup verification code
pub async fn issue_verification_code(
    State(state): State<RewardsAppState>,
    payload: Result<Json<IssueVerificationCodeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RewardsApiError> {
    let Json(request) = payload?;

    state.verification_handler().handle(request.into()).await?;

    Ok(Json(StatusResponse::ok("Verification code sent")))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/leaderboard - Current published ranking
pub async fn get_leaderboard(
    State(state): State<RewardsAppState>,
) -> Result<impl IntoResponse, RewardsApiError> {
    let entries = state
        .get_leaderboard_handler()
        .handle(GetLeaderboardQuery)
        .await?;

    Ok(Json(LeaderboardResponse::from(entries)))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error rendered as `{success: false, message, errorCode}`.
///
/// Messages are the public ones; internal detail is logged, never returned.
#[derive(Debug)]
pub struct RewardsApiError {
    status: StatusCode,
    error: DomainError,
}

impl RewardsApiError {
    fn new(status: StatusCode, error: impl Into<DomainError>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ReferralError> for RewardsApiError {
    fn from(err: ReferralError) -> Self {
        let status = match &err {
            ReferralError::Validation(_) | ReferralError::SelfReferral => StatusCode::BAD_REQUEST,
            ReferralError::InvalidCode => StatusCode::NOT_FOUND,
            ReferralError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err)
    }
}

impl From<LeaderboardError> for RewardsApiError {
    fn from(err: LeaderboardError) -> Self {
        let status = match &err {
            LeaderboardError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            LeaderboardError::InvalidPhase(_) | LeaderboardError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err)
    }
}

impl From<WebhookError> for RewardsApiError {
    fn from(err: WebhookError) -> Self {
        Self::new(err.status_code(), err)
    }
}

impl From<VerificationError> for RewardsApiError {
    fn from(err: VerificationError) -> Self {
        let status = match &err {
            VerificationError::MissingFields(_) => StatusCode::BAD_REQUEST,
            VerificationError::Store(_) | VerificationError::MailDelivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err)
    }
}

impl From<JsonRejection> for RewardsApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::new(
            StatusCode::BAD_REQUEST,
            DomainError::new(ErrorCode::ValidationFailed, "Invalid request body"),
        )
    }
}

impl IntoResponse for RewardsApiError {
    fn into_response(self) -> Response {
        let body = StatusResponse::failure(self.error.code, self.error.message);
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;
    use crate::ports::{MailError, StoreError};

    #[test]
    fn referral_errors_map_to_statuses() {
        assert_eq!(
            RewardsApiError::from(ReferralError::InvalidCode).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RewardsApiError::from(ReferralError::SelfReferral).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RewardsApiError::from(ReferralError::Validation(ValidationError::empty_field(
                "newUserUid"
            )))
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RewardsApiError::from(ReferralError::Store(StoreError::backend("down"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_action_is_bad_request() {
        let err = RewardsApiError::from(LeaderboardError::UnknownAction("wipe".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.error.message.contains("wipe"));
    }

    #[test]
    fn webhook_errors_keep_their_status() {
        assert_eq!(
            RewardsApiError::from(WebhookError::InvalidSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RewardsApiError::from(WebhookError::AccountNotFound("U1".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn mail_failure_is_server_error_without_detail() {
        let err = RewardsApiError::from(VerificationError::MailDelivery(MailError::Rejected(
            "resend said 422".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error.message, "Failed to send verification code");
        assert_eq!(err.error.code, ErrorCode::PartialSideEffect);
    }

    #[test]
    fn default_settings_match_domain_defaults() {
        let settings = RewardsSettings::default();
        assert_eq!(settings.referral_bonus, 100);
        assert_eq!(settings.leaderboard_size, 50);
        assert_eq!(settings.vip_fee.naira(), 5000);
        assert_eq!(settings.verification_ttl_minutes, 15);
    }
}
