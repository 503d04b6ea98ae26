//! State machine trait for phase enums.
//!
//! Implementors declare the legal edges; callers go through
//! [`StateMachine::transition_to`] so an illegal move surfaces as a
//! `ValidationError` instead of silently corrupting the phase.

use super::ValidationError;

pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Whether `target` is a legal next phase.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Moves to `target`, or reports the illegal edge.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "phase",
                format!("illegal phase change {:?} -> {:?}", self, target),
            ));
        }
        Ok(target)
    }
}
