//! Stored verification code documents.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::VerificationCode;

/// One issued code. Records are never overwritten; several may be
/// outstanding for the same user at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCodeRecord {
    pub code: VerificationCode,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub email: String,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Signup details captured alongside the code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupProfile {
    pub referral_code: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl VerificationCodeRecord {
    /// Builds a record valid for `ttl_minutes` from `now`.
    pub fn issue(
        code: VerificationCode,
        email: impl Into<String>,
        profile: SignupProfile,
        now: Timestamp,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            code,
            created_at: now,
            expires_at: now.plus_minutes(ttl_minutes),
            email: email.into(),
            referral_code: non_blank(profile.referral_code),
            display_name: non_blank(profile.display_name),
            photo_url: non_blank(profile.photo_url),
        }
    }

    /// Expired at and after `expiresAt`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// True when `candidate` is this code and the record is still live.
    pub fn matches(&self, candidate: &str, now: Timestamp) -> bool {
        !self.is_expired_at(now) && self.code.as_str() == candidate.trim()
    }

    pub fn lifetime(&self) -> Duration {
        self.expires_at.duration_since(&self.created_at)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
