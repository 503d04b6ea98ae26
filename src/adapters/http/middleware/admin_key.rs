//! Admin API key extractor.
//!
//! Admin endpoints require `Authorization: Bearer <admin key>`. The key is
//! compared in constant time; the only early exit is on length.
//!
//! ```ignore
//! async fn admin_only(_admin: RequireAdmin) -> impl IntoResponse { "ok" }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::adapters::http::rewards::dto::StatusResponse;
use crate::domain::foundation::ErrorCode;

/// The configured admin key, shared across requests.
#[derive(Clone)]
pub struct AdminKey(Arc<SecretString>);

impl AdminKey {
    pub fn new(key: SecretString) -> Self {
        Self(Arc::new(key))
    }

    /// Constant-time comparison against a presented key.
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.0.expose_secret().as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected.ct_eq(presented).into()
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey([REDACTED])")
    }
}

/// Extractor that admits only requests carrying the admin key.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

/// Rejection for a missing or wrong admin key.
#[derive(Debug)]
pub struct AdminKeyRejection;

impl IntoResponse for AdminKeyRejection {
    fn into_response(self) -> Response {
        let body = StatusResponse::failure(ErrorCode::Unauthorized, "Unauthorized");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    AdminKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminKeyRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = AdminKey::from_ref(state);

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if key.matches(token) => Ok(RequireAdmin),
            Some(_) => {
                tracing::warn!("Admin request rejected: wrong key");
                Err(AdminKeyRejection)
            }
            None => {
                tracing::warn!("Admin request rejected: no bearer token");
                Err(AdminKeyRejection)
            }
        }
    }
}
