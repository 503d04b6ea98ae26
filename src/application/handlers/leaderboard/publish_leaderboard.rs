//! PublishLeaderboardHandler - replaces the public ranking with the current top N.

use crate::application::ledger::{to_fields, LedgerStore};
use crate::domain::foundation::Timestamp;
use crate::domain::leaderboard::{rank_accounts, LeaderboardEntry, LeaderboardError};
use crate::ports::WriteBatch;

/// Result of a publish.
#[derive(Debug, Clone)]
pub struct PublishLeaderboardResult {
    pub users_updated: usize,
    pub entries: Vec<LeaderboardEntry>,
}

/// Handler for publishing the weekly ranking.
///
/// Old entries are deleted and new ones written in the same batch, so a
/// reader sees either the previous ranking or the new one.
pub struct PublishLeaderboardHandler {
    ledger: LedgerStore,
    size: usize,
}

impl PublishLeaderboardHandler {
    pub fn new(ledger: LedgerStore, size: usize) -> Self {
        Self { ledger, size }
    }

    pub async fn handle(&self) -> Result<PublishLeaderboardResult, LeaderboardError> {
        let top = self.ledger.top_accounts_by_weekly_coins(self.size).await?;
        let stale = self.ledger.list_leaderboard_paths().await?;

        let entries = rank_accounts(&top, self.size, Timestamp::now());

        let mut batch = WriteBatch::new();
        for path in stale.iter().cloned() {
            batch.delete(path);
        }
        for entry in &entries {
            let path = LedgerStore::new_leaderboard_path()?;
            let fields = to_fields(&path, entry)?;
            batch.set(path, fields);
        }

        self.ledger.commit(batch).await.map_err(|e| {
            tracing::error!(error = %e, "Leaderboard publish failed");
            LeaderboardError::from(e)
        })?;

        tracing::info!(
            users_updated = entries.len(),
            replaced = stale.len(),
            "Leaderboard published"
        );
        Ok(PublishLeaderboardResult {
            users_updated: entries.len(),
            entries,
        })
    }
}
