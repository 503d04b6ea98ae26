//! Leaderboard cycle phases.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Phase of one leaderboard cycle.
///
/// ```text
/// Idle ──► Resetting ──► Publishing ──► Idle
///   └───────────────────────►┘
/// ```
///
/// A failed step returns straight to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Idle,
    Resetting,
    Publishing,
}

impl StateMachine for CyclePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CyclePhase::*;
        matches!(
            (self, target),
            (Idle, Resetting)
                | (Idle, Publishing)
                | (Resetting, Publishing)
                | (Resetting, Idle)
                | (Publishing, Idle)
        )
    }
}
