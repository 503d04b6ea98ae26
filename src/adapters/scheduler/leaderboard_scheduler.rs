//! LeaderboardScheduler - periodic weekly reset.
//!
//! Runs the `reset` action (zero weekly coins, then republish) on a fixed
//! interval. A failed cycle is logged and the next tick tries again; the
//! loop itself only stops on the shutdown signal.
//!
//! ## Graceful Shutdown
//!
//! The scheduler listens on a `watch` channel and exits between cycles.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::handlers::{
    RunLeaderboardActionCommand, RunLeaderboardActionHandler, RunLeaderboardActionResult,
};
use crate::domain::leaderboard::{LeaderboardAction, LeaderboardError};

/// Background task that resets the weekly leaderboard.
pub struct LeaderboardScheduler {
    handler: RunLeaderboardActionHandler,
    interval: Duration,
}

impl LeaderboardScheduler {
    pub fn new(handler: RunLeaderboardActionHandler, interval: Duration) -> Self {
        Self { handler, interval }
    }

    /// Run until `shutdown` flips to true or its sender is dropped.
    ///
    /// The first cycle runs one full interval after start, not immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let start = time::Instant::now() + self.interval;
        let mut interval = time::interval_at(start, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "Leaderboard scheduler started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Leaderboard scheduler stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::error!(error = %e, "Scheduled leaderboard reset failed");
                    }
                }
            }
        }
    }

    /// Run exactly one reset cycle.
    pub async fn run_once(&self) -> Result<RunLeaderboardActionResult, LeaderboardError> {
        let cmd = RunLeaderboardActionCommand {
            action: LeaderboardAction::Reset.to_string(),
        };
        let result = self.handler.handle(cmd).await?;
        tracing::info!(?result, "Scheduled leaderboard reset complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::application::handlers::{PublishLeaderboardHandler, ResetWeeklyCountersHandler};
    use crate::application::ledger::LedgerStore;
    use serde_json::json;
    use std::sync::Arc;

    fn scheduler(store: Arc<InMemoryDocumentStore>, interval: Duration) -> LeaderboardScheduler {
        let ledger = LedgerStore::new(store);
        let handler = RunLeaderboardActionHandler::new(
            ResetWeeklyCountersHandler::new(ledger.clone()),
            PublishLeaderboardHandler::new(ledger, 50),
        );
        LeaderboardScheduler::new(handler, interval)
    }

    fn seed(store: &InMemoryDocumentStore) {
        store.insert(
            "users/U1",
            json!({"email": "a@example.com", "displayName": "Ada", "coins": 10, "weeklyCoins": 30}),
        );
        store.insert(
            "users/U2",
            json!({"email": "b@example.com", "displayName": "Bo", "coins": 5, "weeklyCoins": 20}),
        );
    }

    #[tokio::test]
    async fn run_once_zeroes_weekly_coins() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store);

        let result = scheduler(store.clone(), Duration::from_secs(3600))
            .run_once()
            .await
            .unwrap();

        assert_eq!(
            result,
            RunLeaderboardActionResult::Reset {
                users_affected: 2,
                users_updated: 2
            }
        );
        assert_eq!(store.fields("users/U1").unwrap()["weeklyCoins"], json!(0));
        assert_eq!(store.fields("users/U1").unwrap()["coins"], json!(10));
    }

    #[tokio::test]
    async fn run_once_reports_store_failure() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store);
        store.fail_commits(true);

        let result = scheduler(store, Duration::from_secs(3600)).run_once().await;
        assert!(matches!(result, Err(LeaderboardError::Store(_))));
    }

    #[tokio::test]
    async fn shutdown_stops_before_first_tick() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store);
        let scheduler = scheduler(store.clone(), Duration::from_secs(3600));
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(async move { scheduler.run(rx).await });
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn tick_runs_a_reset_cycle() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store);
        let scheduler = scheduler(store.clone(), Duration::from_millis(50));
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(async move { scheduler.run(rx).await });
        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(true).unwrap();
        task.await.unwrap();

        assert_eq!(store.fields("users/U2").unwrap()["weeklyCoins"], json!(0));
    }
}
