//! GetLeaderboardHandler - reads the published ranking.

use crate::application::ledger::LedgerStore;
use crate::domain::leaderboard::{LeaderboardEntry, LeaderboardError};

/// Query for the current ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetLeaderboardQuery;

pub struct GetLeaderboardHandler {
    ledger: LedgerStore,
}

impl GetLeaderboardHandler {
    pub fn new(ledger: LedgerStore) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        _query: GetLeaderboardQuery,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.ledger.list_leaderboard().await?)
    }
}
