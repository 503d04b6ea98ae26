//! Integration tests for the rewards HTTP surface.
//!
//! Requests go through the full axum router backed by the in-memory store
//! and mail adapters, so each test checks status codes, response bodies and
//! the documents left behind.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use rewards_ledger::adapters::http::{rewards_router, RewardsAppState, RewardsSettings};
use rewards_ledger::adapters::{InMemoryDocumentStore, InMemoryMailSender};
use rewards_ledger::application::ledger::LedgerStore;
use rewards_ledger::domain::entitlement::sign_payload;
use rewards_ledger::domain::foundation::UserId;

const PAYSTACK_SECRET: &str = "sk_test_integration_secret";
const ADMIN_KEY: &str = "admin-key-0123456789abcdef";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    store: Arc<InMemoryDocumentStore>,
    mailer: Arc<InMemoryMailSender>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_mailer(InMemoryMailSender::new())
    }

    fn with_mailer(mailer: InMemoryMailSender) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mailer = Arc::new(mailer);
        let state = RewardsAppState::new(
            LedgerStore::new(store.clone()),
            mailer.clone(),
            &SecretString::new(PAYSTACK_SECRET.to_string()),
            SecretString::new(ADMIN_KEY.to_string()),
            RewardsSettings::default(),
        );
        Self {
            store,
            mailer,
            router: rewards_router(state),
        }
    }

    fn ledger(&self) -> LedgerStore {
        LedgerStore::new(self.store.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn admin_action(&self, key: Option<&str>, action: &str) -> (StatusCode, Value) {
        let mut builder = Request::post("/api/admin/leaderboard")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        let request = builder
            .body(Body::from(json!({ "action": action }).to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn webhook(&self, header_name: &str, payload: &[u8], signature: &str) -> (StatusCode, Value) {
        let request = Request::post("/api/webhooks/paystack")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header_name, signature)
            .body(Body::from(payload.to_vec()))
            .unwrap();
        self.send(request).await
    }

    fn seed_user(&self, id: &str, fields: Value) {
        self.store.insert(&format!("users/{}", id), fields);
    }
}

fn vip_charge(user_id: &str, reference: &str, amount: u64) -> Vec<u8> {
    json!({
        "event": "charge.success",
        "data": {
            "amount": amount,
            "reference": reference,
            "metadata": {"payment_type": "vip_subscription", "user_id": user_id}
        }
    })
    .to_string()
    .into_bytes()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

// =============================================================================
// Referrals
// =============================================================================

#[tokio::test]
async fn referral_credits_only_the_referrer() {
    let app = TestApp::new();
    app.seed_user("REF", json!({"email": "ref@example.com", "referralCode": "ABC123", "coins": 50}));
    app.seed_user("NEW", json!({"email": "new@example.com", "coins": 0}));

    let (status, body) = app
        .post_json("/api/referrals", json!({"newUserUid": "NEW", "referralCode": " abc123 "}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(app.store.fields("users/REF").unwrap()["coins"], json!(150));
    assert_eq!(app.store.fields("users/NEW").unwrap()["coins"], json!(0));
}

#[tokio::test]
async fn unknown_referral_code_writes_nothing() {
    let app = TestApp::new();
    app.seed_user("REF", json!({"email": "ref@example.com", "referralCode": "ABC123", "coins": 50}));

    let (status, body) = app
        .post_json("/api/referrals", json!({"newUserUid": "NEW", "referralCode": "ZZZ999"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid referral code"));
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn code_with_inner_space_is_not_found() {
    let app = TestApp::new();
    app.seed_user("REF", json!({"email": "ref@example.com", "referralCode": "ABC123", "coins": 50}));

    let (status, body) = app
        .post_json("/api/referrals", json!({"newUserUid": "NEW", "referralCode": "ABC 123"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], json!("INVALID_REFERRAL_CODE"));
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn self_referral_writes_nothing() {
    let app = TestApp::new();
    app.seed_user("REF", json!({"email": "ref@example.com", "referralCode": "ABC123", "coins": 50}));

    let (status, body) = app
        .post_json("/api/referrals", json!({"newUserUid": "REF", "referralCode": "ABC123"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("SELF_REFERRAL"));
    assert_eq!(app.store.fields("users/REF").unwrap()["coins"], json!(50));
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn referral_with_missing_fields_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api/referrals", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(app.store.read_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_our_body() {
    let app = TestApp::new();
    let request = Request::post("/api/referrals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid request body"));
}

// =============================================================================
// Leaderboard
// =============================================================================

#[tokio::test]
async fn admin_action_requires_the_admin_key() {
    let app = TestApp::new();

    let (status, body) = app.admin_action(None, "update").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = app.admin_action(Some("definitely-not-the-key"), "update").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.read_count(), 0);
}

#[tokio::test]
async fn unknown_admin_action_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.admin_action(Some(ADMIN_KEY), "wipe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("wipe"));
    assert_eq!(app.store.read_count(), 0);
}

#[tokio::test]
async fn update_publishes_ranking_readable_by_anyone() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com", "displayName": "Ada", "weeklyCoins": 10}));
    app.seed_user("U2", json!({"email": "b@example.com", "displayName": "Bo", "weeklyCoins": 30}));
    app.seed_user("U3", json!({"email": "c@example.com", "displayName": "Cy", "weeklyCoins": 20}));

    let (status, body) = app.admin_action(Some(ADMIN_KEY), "update").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["usersUpdated"], json!(3));
    assert!(body.get("usersAffected").is_none());

    let (status, body) = app
        .send(Request::get("/api/leaderboard").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["user"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bo", "Cy", "Ada"]);
    assert_eq!(body["entries"][0]["rank"], json!(1));
    assert_eq!(body["entries"][0]["score"], json!(30));
}

#[tokio::test]
async fn repeated_update_leaves_the_same_ranking() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com", "displayName": "Ada", "weeklyCoins": 10}));
    app.seed_user("U2", json!({"email": "b@example.com", "displayName": "Bo", "weeklyCoins": 30}));

    app.admin_action(Some(ADMIN_KEY), "update").await;
    app.admin_action(Some(ADMIN_KEY), "update").await;

    assert_eq!(app.store.count("leaderboard"), 2);
}

#[tokio::test]
async fn reset_zeroes_weekly_coins_and_republishes() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com", "coins": 7, "weeklyCoins": 10}));
    app.seed_user("U2", json!({"email": "b@example.com", "coins": 9, "weeklyCoins": 30}));

    let (status, body) = app.admin_action(Some(ADMIN_KEY), "reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usersAffected"], json!(2));
    assert_eq!(body["usersUpdated"], json!(2));
    assert_eq!(app.store.fields("users/U1").unwrap()["weeklyCoins"], json!(0));
    assert_eq!(app.store.fields("users/U1").unwrap()["coins"], json!(7));
}

#[tokio::test]
async fn reset_with_no_accounts_succeeds() {
    let app = TestApp::new();

    let (status, body) = app.admin_action(Some(ADMIN_KEY), "reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usersAffected"], json!(0));
    assert_eq!(app.store.commit_count(), 0);
}

// =============================================================================
// Paystack webhook
// =============================================================================

#[tokio::test]
async fn tampered_webhook_is_rejected_before_any_read() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com"}));
    let payload = vip_charge("U1", "ref_1", 500_000);
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let mut tampered = payload.clone();
    let last = tampered.len() - 2;
    tampered[last] ^= 0x01;

    let (status, body) = app.webhook("x-paystack-signature", &tampered, &signature).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(app.store.read_count(), 0);
}

#[tokio::test]
async fn webhook_without_signature_is_unauthorized() {
    let app = TestApp::new();
    let request = Request::post("/api/webhooks/paystack")
        .body(Body::from(vip_charge("U1", "ref_1", 500_000)))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn vip_charge_grants_once_across_redeliveries() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com", "isVip": false}));
    let payload = vip_charge("U1", "ref_vip_1", 500_000);
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, _) = app.webhook("x-paystack-signature", &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.fields("users/U1").unwrap()["isVip"], json!(true));
    assert!(app.store.fields("payments/ref_vip_1").is_some());

    let (status, body) = app.webhook("x-paystack-signature", &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(app.store.fields("users/U1").unwrap()["isVip"], json!(true));
    assert_eq!(app.store.commit_count(), 1);
}

#[tokio::test]
async fn short_payment_is_acknowledged_without_entitlement() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com", "isVip": false}));
    let payload = vip_charge("U1", "ref_short", 499_900);
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, _) = app.webhook("x-paystack-signature", &payload, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.fields("users/U1").unwrap()["isVip"], json!(false));
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn bare_signature_header_is_accepted() {
    let app = TestApp::new();
    app.seed_user("U1", json!({"email": "a@example.com"}));
    let payload = vip_charge("U1", "ref_bare", 500_000);
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, _) = app.webhook("signature", &payload, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.fields("users/U1").unwrap()["isVip"], json!(true));
}

#[tokio::test]
async fn charge_for_unknown_account_asks_for_redelivery() {
    let app = TestApp::new();
    let payload = vip_charge("GHOST", "ref_ghost", 500_000);
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, body) = app.webhook("x-paystack-signature", &payload, &signature).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["message"].as_str().unwrap().contains("GHOST"));
}

#[tokio::test]
async fn signed_garbage_is_bad_request() {
    let app = TestApp::new();
    let payload = b"this is not json".to_vec();
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, _) = app.webhook("x-paystack-signature", &payload, &signature).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_events_are_acknowledged_without_writes() {
    let app = TestApp::new();
    let payload = json!({"event": "transfer.success", "data": {"reference": "t1"}})
        .to_string()
        .into_bytes();
    let signature = sign_payload(PAYSTACK_SECRET, &payload);

    let (status, _) = app.webhook("x-paystack-signature", &payload, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.commit_count(), 0);
}

// =============================================================================
// Verification codes
// =============================================================================

#[tokio::test]
async fn verification_code_is_stored_and_mailed() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/verification-codes",
            json!({"uid": "U1", "email": "ada@example.com", "displayName": "Ada", "referralCode": "ABC123"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let records = app
        .ledger()
        .list_verification_codes(&UserId::new("U1").unwrap())
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.lifetime(), chrono::Duration::minutes(15));

    let code: u32 = record.code.as_str().parse().unwrap();
    assert!((100_000..=999_999).contains(&code));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert!(sent[0].html.contains(record.code.as_str()));
    assert!(sent[0].html.contains("15 minutes"));
}

#[tokio::test]
async fn verification_without_email_sends_nothing() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/verification-codes", json!({"uid": "U1"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Missing required fields"));
    assert!(app.mailer.sent().is_empty());
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn mail_failure_is_reported_after_the_code_is_stored() {
    let app = TestApp::with_mailer(InMemoryMailSender::failing());

    let (status, body) = app
        .post_json("/api/verification-codes", json!({"uid": "U1", "email": "ada@example.com"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("PARTIAL_SIDE_EFFECT"));
    assert_eq!(app.store.commit_count(), 1);
}
