//! Error taxonomy for session operations.

use crate::types::{Phase, QuestionId};

/// Everything a transition can fail with. Exactly one kind per failure and
/// never partial mutation: a failed action leaves the shared session
/// unchanged, and callers surface the failure to the acting participant
/// rather than retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("the name \"{0}\" is already taken in this session")]
    DuplicateName(String),

    #[error("operation is not allowed in the {0:?} phase")]
    InvalidPhase(Phase),

    #[error("it is not {0}'s turn")]
    NotYourTurn(String),

    #[error("need at least {min} players, only {have} joined")]
    NotEnoughPlayers { min: usize, have: usize },

    #[error("player \"{0}\" has not submitted passwords yet")]
    IncompleteSetup(String),

    #[error("the password pool cannot satisfy the no-own-password rule; try again")]
    InsufficientPasswords,

    #[error("submission contains no usable passwords")]
    EmptySubmission,

    #[error("no question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("\"{0}\" is not an expected responder for this question")]
    NotExpectedResponder(String),

    #[error("no player named \"{0}\" in this session")]
    UnknownPlayer(String),

    #[error("no session with code {0}")]
    UnknownSession(String),
}

impl GameError {
    /// Stable wire code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidInput(_) => "INVALID_INPUT",
            GameError::DuplicateName(_) => "DUPLICATE_NAME",
            GameError::InvalidPhase(_) => "INVALID_PHASE",
            GameError::NotYourTurn(_) => "NOT_YOUR_TURN",
            GameError::NotEnoughPlayers { .. } => "NOT_ENOUGH_PLAYERS",
            GameError::IncompleteSetup(_) => "INCOMPLETE_SETUP",
            GameError::InsufficientPasswords => "INSUFFICIENT_PASSWORDS",
            GameError::EmptySubmission => "EMPTY_SUBMISSION",
            GameError::UnknownQuestion(_) => "UNKNOWN_QUESTION",
            GameError::NotExpectedResponder(_) => "NOT_EXPECTED_RESPONDER",
            GameError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            GameError::UnknownSession(_) => "UNKNOWN_SESSION",
        }
    }
}

/// Store-internal failures. Version conflicts are retried by the publish
/// loop and never reach clients as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no session with code {0}")]
    NotFound(String),

    #[error("version conflict: expected {expected}, stored {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("session code {0} is already in use")]
    CodeInUse(String),
}
