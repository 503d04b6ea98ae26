//! Public ranking entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Denormalized user summary carried on each entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub email: String,
}

/// One row of the published weekly ranking.
///
/// Entries have no identity across cycles: each publish deletes the whole
/// collection and writes a fresh set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub score: u64,
    pub user: LeaderboardUser,
    pub published_at: Timestamp,
}

impl LeaderboardEntry {
    /// Same rank, score and user, ignoring when it was published.
    pub fn same_standing(&self, other: &LeaderboardEntry) -> bool {
        self.rank == other.rank && self.score == other.score && self.user == other.user
    }
}
