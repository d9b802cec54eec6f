//! Engine error taxonomy.
//!
//! Configuration and invalid-target errors are recoverable: the caller
//! reports them to the moderator and the turn does not advance. Outcomes
//! that need human judgement are not errors at all; they surface as a
//! [`PendingPrompt`](crate::resolution::PendingPrompt) on the outcome.

use thiserror::Error;

use crate::core::{RoleId, SeatId};

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A seat refers to a role id the registry does not know.
    #[error("unknown role id `{0}`")]
    UnknownRole(RoleId),

    /// A seat id that does not exist on the board.
    #[error("no such seat: {0}")]
    UnknownSeat(SeatId),

    /// The number of chosen targets is outside the role's declared range.
    #[error("expected between {min} and {max} targets, got {got}")]
    TargetCount { min: u8, max: u8, got: usize },

    /// A chosen target fails the role's eligibility predicate.
    #[error("{seat} is not a legal target: {reason}")]
    IneligibleTarget { seat: SeatId, reason: String },

    /// The acting seat has no action to resolve this night.
    #[error("{0} has no night action to resolve")]
    NoAction(SeatId),

    /// The queue cannot advance while a prompt waits for the moderator.
    #[error("a moderator decision is outstanding")]
    PromptOutstanding,

    /// A prompt answer was supplied but nothing is waiting for one.
    #[error("no moderator decision is pending")]
    NoPendingPrompt,

    /// The answer does not fit the outstanding prompt.
    #[error("answer does not match the pending prompt: {0}")]
    PromptMismatch(String),

    /// The current turn was already resolved; advance before resolving again.
    #[error("{0}'s turn has already been resolved")]
    TurnAlreadyResolved(SeatId),

    /// A nomination the day's rules do not allow.
    #[error("{seat} cannot nominate: {reason}")]
    NominationRefused { seat: SeatId, reason: String },

    /// The night queue has no further entries.
    #[error("the night queue is exhausted")]
    QueueExhausted,

    /// The game already has a verdict.
    #[error("the game is already over")]
    GameOver,

    /// Record encoding or decoding failed.
    #[error("record codec error: {0}")]
    Codec(String),
}

impl EngineError {
    /// Whether this error stems from bad configuration rather than a bad
    /// choice made at the table.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownRole(_) | EngineError::UnknownSeat(_) | EngineError::Codec(_)
        )
    }

    /// Whether this error rejects the moderator's target selection.
    #[must_use]
    pub fn is_target_error(&self) -> bool {
        matches!(
            self,
            EngineError::TargetCount { .. }
                | EngineError::IneligibleTarget { .. }
                | EngineError::NominationRefused { .. }
        )
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Codec(err.to_string())
    }
}

/// Result alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(EngineError::UnknownRole(RoleId::new("nobody")).is_config_error());
        assert!(!EngineError::UnknownRole(RoleId::new("nobody")).is_target_error());

        let err = EngineError::TargetCount { min: 1, max: 1, got: 0 };
        assert!(err.is_target_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_display() {
        let err = EngineError::IneligibleTarget {
            seat: SeatId::new(2),
            reason: "cannot choose yourself".to_string(),
        };
        assert_eq!(err.to_string(), "Seat 3 is not a legal target: cannot choose yourself");
    }
}
