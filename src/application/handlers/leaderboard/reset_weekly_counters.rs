//! ResetWeeklyCountersHandler - zeroes every account's weekly counter.

use serde_json::json;

use crate::application::ledger::LedgerStore;
use crate::domain::account::fields;
use crate::domain::leaderboard::LeaderboardError;
use crate::ports::{FieldUpdate, WriteBatch};

/// Result of a weekly reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetWeeklyCountersResult {
    pub users_affected: usize,
}

/// Handler for the weekly counter reset.
///
/// All counters are zeroed in a single batch. The scan only needs account
/// paths, so a document with an unreadable balance is still reset.
pub struct ResetWeeklyCountersHandler {
    ledger: LedgerStore,
}

impl ResetWeeklyCountersHandler {
    pub fn new(ledger: LedgerStore) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self) -> Result<ResetWeeklyCountersResult, LeaderboardError> {
        let paths = self.ledger.list_account_paths().await?;
        if paths.is_empty() {
            tracing::info!("No accounts to reset");
            return Ok(ResetWeeklyCountersResult { users_affected: 0 });
        }

        let mut batch = WriteBatch::new();
        for path in &paths {
            batch.update(
                path.clone(),
                vec![(fields::WEEKLY_COINS.to_string(), FieldUpdate::Set(json!(0)))],
            );
        }

        self.ledger.commit(batch).await.map_err(|e| {
            tracing::error!(error = %e, accounts = paths.len(), "Weekly reset failed");
            LeaderboardError::from(e)
        })?;

        tracing::info!(users_affected = paths.len(), "Weekly counters reset");
        Ok(ResetWeeklyCountersResult {
            users_affected: paths.len(),
        })
    }
}
