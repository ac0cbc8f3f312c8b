//! Error taxonomy shared by every part of the round protocol.

use crate::protocol::RoundStage;
use thiserror::Error;

/// Why a move list cannot be turned into a relation table
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("there must be at least 3 moves, got {0}")]
    TooFewMoves(usize),

    #[error("all moves must have unique names, {0:?} appears more than once")]
    DuplicateMove(String),

    #[error("there must be an odd number of moves, got {0}")]
    EvenMoveCount(usize),
}

/// Errors from rules, commitment, and referee operations
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),

    #[error("unknown move: {0:?}")]
    UnknownMove(String),

    #[error("secure random source unavailable: {0}")]
    InsufficientEntropy(String),

    #[error("cannot choose a move from an empty move set")]
    EmptyMoveSet,

    #[error("nothing has been committed yet")]
    NothingCommitted,

    #[error("round is {actual}, expected {expected}")]
    WrongStage {
        expected: RoundStage,
        actual: RoundStage,
    },
}

impl From<rand::Error> for GameError {
    fn from(err: rand::Error) -> Self {
        GameError::InsufficientEntropy(err.to_string())
    }
}
