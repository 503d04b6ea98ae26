//! RunLeaderboardActionHandler - drives one reset/publish cycle.

use crate::domain::foundation::StateMachine;
use crate::domain::leaderboard::{CyclePhase, LeaderboardAction, LeaderboardError};

use super::{PublishLeaderboardHandler, ResetWeeklyCountersHandler};

/// Command naming the admin action, as received.
#[derive(Debug, Clone)]
pub struct RunLeaderboardActionCommand {
    pub action: String,
}

/// Outcome of a completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLeaderboardActionResult {
    /// Counters zeroed, then the ranking republished.
    Reset {
        users_affected: usize,
        users_updated: usize,
    },
    /// Ranking republished only.
    Updated { users_updated: usize },
}

/// Handler for admin and scheduled leaderboard actions.
///
/// `reset`: Idle → Resetting → Publishing → Idle.
/// `update`: Idle → Publishing → Idle.
pub struct RunLeaderboardActionHandler {
    reset: ResetWeeklyCountersHandler,
    publish: PublishLeaderboardHandler,
}

impl RunLeaderboardActionHandler {
    pub fn new(reset: ResetWeeklyCountersHandler, publish: PublishLeaderboardHandler) -> Self {
        Self { reset, publish }
    }

    pub async fn handle(
        &self,
        cmd: RunLeaderboardActionCommand,
    ) -> Result<RunLeaderboardActionResult, LeaderboardError> {
        let action: LeaderboardAction = cmd.action.parse()?;
        tracing::info!(%action, "Leaderboard cycle started");

        let phase = CyclePhase::Idle;
        match action {
            LeaderboardAction::Reset => {
                let phase = phase.transition_to(CyclePhase::Resetting)?;
                let reset = self.reset.handle().await?;

                let phase = phase.transition_to(CyclePhase::Publishing)?;
                let published = self.publish.handle().await?;

                phase.transition_to(CyclePhase::Idle)?;
                Ok(RunLeaderboardActionResult::Reset {
                    users_affected: reset.users_affected,
                    users_updated: published.users_updated,
                })
            }
            LeaderboardAction::Update => {
                let phase = phase.transition_to(CyclePhase::Publishing)?;
                let published = self.publish.handle().await?;

                phase.transition_to(CyclePhase::Idle)?;
                Ok(RunLeaderboardActionResult::Updated {
                    users_updated: published.users_updated,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::application::ledger::LedgerStore;
    use serde_json::json;
    use std::sync::Arc;

    fn handler(store: &Arc<InMemoryDocumentStore>) -> RunLeaderboardActionHandler {
        let ledger = LedgerStore::new(store.clone());
        RunLeaderboardActionHandler::new(
            ResetWeeklyCountersHandler::new(ledger.clone()),
            PublishLeaderboardHandler::new(ledger, 50),
        )
    }

    fn cmd(action: &str) -> RunLeaderboardActionCommand {
        RunLeaderboardActionCommand {
            action: action.to_string(),
        }
    }

    #[tokio::test]
    async fn reset_zeroes_then_publishes() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/a", json!({"email": "a@x.y", "weeklyCoins": 12}));
        store.insert("users/b", json!({"email": "b@x.y", "weeklyCoins": 3}));

        let result = handler(&store).handle(cmd("reset")).await.unwrap();

        assert_eq!(
            result,
            RunLeaderboardActionResult::Reset {
                users_affected: 2,
                users_updated: 2
            }
        );
        assert_eq!(store.fields("users/a").unwrap()["weeklyCoins"], json!(0));
        assert_eq!(store.count("leaderboard"), 2);
        assert_eq!(store.commit_count(), 2);
    }

    #[tokio::test]
    async fn reset_publishes_accounts_with_unusual_referral_codes() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/a", json!({"email": "a@x.y", "weeklyCoins": 12}));
        store.insert(
            "users/b",
            json!({"email": "b@x.y", "weeklyCoins": 3, "referralCode": "MY CODE"}),
        );
        store.insert("leaderboard/old", json!({"rank": 1, "score": 99, "name": "Stale"}));

        let result = handler(&store).handle(cmd("reset")).await.unwrap();

        assert_eq!(
            result,
            RunLeaderboardActionResult::Reset {
                users_affected: 2,
                users_updated: 2
            }
        );
        assert!(store.fields("leaderboard/old").is_none());
        assert_eq!(store.count("leaderboard"), 2);
    }

    #[tokio::test]
    async fn update_publishes_without_reset() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/a", json!({"email": "a@x.y", "weeklyCoins": 12}));

        let result = handler(&store).handle(cmd("update")).await.unwrap();

        assert_eq!(result, RunLeaderboardActionResult::Updated { users_updated: 1 });
        assert_eq!(store.fields("users/a").unwrap()["weeklyCoins"], json!(12));
    }

    #[tokio::test]
    async fn unknown_action_touches_nothing() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/a", json!({"email": "a@x.y", "weeklyCoins": 12}));

        let result = handler(&store).handle(cmd("purge")).await;

        assert!(matches!(result, Err(LeaderboardError::UnknownAction(a)) if a == "purge"));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn failed_reset_does_not_publish() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/a", json!({"email": "a@x.y", "weeklyCoins": 12}));
        store.fail_commits(true);

        let result = handler(&store).handle(cmd("reset")).await;

        assert!(matches!(result, Err(LeaderboardError::Store(_))));
        assert_eq!(store.count("leaderboard"), 0);
    }
}
