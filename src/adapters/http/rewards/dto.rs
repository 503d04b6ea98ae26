//! HTTP DTOs for the rewards endpoints.
//!
//! Field names are camelCase on the wire. Request fields default to empty so
//! that a missing field surfaces as a validation failure with our own error
//! body instead of a deserializer rejection.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    ApplyReferralBonusCommand, IssueVerificationCodeCommand, RunLeaderboardActionResult,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::leaderboard::LeaderboardEntry;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to credit the owner of a referral code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReferralRequest {
    #[serde(default)]
    pub new_user_uid: String,
    #[serde(default)]
    pub referral_code: String,
}

impl From<ApplyReferralRequest> for ApplyReferralBonusCommand {
    fn from(request: ApplyReferralRequest) -> Self {
        Self {
            new_user_id: request.new_user_uid,
            referral_code: request.referral_code,
        }
    }
}

/// Operator request to run a leaderboard action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardActionRequest {
    #[serde(default)]
    pub action: String,
}

/// Request to issue a signup verification code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueVerificationCodeRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl From<IssueVerificationCodeRequest> for IssueVerificationCodeCommand {
    fn from(request: IssueVerificationCodeRequest) -> Self {
        Self {
            uid: request.uid,
            email: request.email,
            referral_code: request.referral_code,
            display_name: request.display_name,
            photo_url: request.photo_url,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `{success, message}` body shared by every processor endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    /// Error code for programmatic handling, on failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: Some(code.to_string()),
        }
    }
}

/// Result of an operator leaderboard action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_affected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_updated: Option<usize>,
}

impl From<RunLeaderboardActionResult> for LeaderboardActionResponse {
    fn from(result: RunLeaderboardActionResult) -> Self {
        match result {
            RunLeaderboardActionResult::Reset {
                users_affected,
                users_updated,
            } => Self {
                success: true,
                message: "Weekly coins reset and leaderboard updated".to_string(),
                users_affected: Some(users_affected),
                users_updated: Some(users_updated),
            },
            RunLeaderboardActionResult::Updated { users_updated } => Self {
                success: true,
                message: "Leaderboard updated".to_string(),
                users_affected: None,
                users_updated: Some(users_updated),
            },
        }
    }
}

/// Public view of a ranked user. The email on the stored entry is not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardUserResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryResponse {
    pub rank: u32,
    pub score: u64,
    pub user: LeaderboardUserResponse,
}

impl From<LeaderboardEntry> for LeaderboardEntryResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            score: entry.score,
            user: LeaderboardUserResponse {
                id: entry.user.id,
                name: entry.user.name,
                avatar: entry.user.avatar,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntryResponse>,
}

impl From<Vec<LeaderboardEntry>> for LeaderboardResponse {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}
