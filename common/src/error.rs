use thiserror::Error;

use crate::Phase;

/// Malformed or out-of-range player input. Surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select Odd or Even first!")]
    MissingChoice,
    #[error("Please enter a valid whole number between 1 and 10! (got {value})")]
    OutOfRange { value: i64 },
    #[error("Please enter a valid whole number between 1 and 10! (got {input:?})")]
    NotANumber { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConcurrencyError {
    #[error("a toss or turn is still being resolved")]
    Locked,
}

/// A precondition of the state machine was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no turn can be played right now")]
    InvalidTurn,
    #[error("declaring is only possible while batting in the first innings with runs on the board")]
    DeclareNotAllowed,
    #[error("expected phase {expected:?}, match is in {actual:?}")]
    UnexpectedPhase { expected: Phase, actual: Phase },
    #[error("the match is over, reset to play again")]
    MatchOver,
}

/// Every refusal leaves the match state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),
    #[error(transparent)]
    State(#[from] StateError),
}

impl MatchError {
    /// Errors the user should see. Lock and state refusals are dropped quietly.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, MatchError::Validation(_))
    }
}
