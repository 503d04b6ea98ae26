//! Admin actions accepted by the leaderboard endpoint.

use std::fmt;
use std::str::FromStr;

use super::LeaderboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardAction {
    /// Zero weekly counters, then publish.
    Reset,
    /// Publish only.
    Update,
}

impl FromStr for LeaderboardAction {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reset" => Ok(LeaderboardAction::Reset),
            "update" => Ok(LeaderboardAction::Update),
            other => Err(LeaderboardError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for LeaderboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardAction::Reset => write!(f, "reset"),
            LeaderboardAction::Update => write!(f, "update"),
        }
    }
}
