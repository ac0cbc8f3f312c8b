//! Circular win/lose/draw relation over an odd-length move list.
//!
//! Each move loses to the (N-1)/2 moves that follow it in the list and beats
//! the (N-1)/2 moves that precede it, wrapping around at the ends. For
//! `[rock, paper, scissors]` this is the classic game; for
//! `[rock, spock, paper, lizard, scissors]` it is the five-move variant.

use super::MoveSet;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Result of one move against another, from the first move's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Draw,
    Lose,
    Win,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Draw => "draw",
            Outcome::Lose => "lose",
            Outcome::Win => "win",
        }
    }

    /// Same pairing seen from the other side
    pub fn inverse(&self) -> Outcome {
        match self {
            Outcome::Draw => Outcome::Draw,
            Outcome::Lose => Outcome::Win,
            Outcome::Win => Outcome::Lose,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Precomputed outcome of every ordered pair of moves
#[derive(Clone, Debug)]
pub struct RelationTable {
    moves: MoveSet,
    /// Row-major N x N matrix, `outcomes[a * N + b]` is `a` against `b`
    outcomes: Vec<Outcome>,
}

impl RelationTable {
    /// Validate the move list and compute the full relation matrix
    pub fn build<I, S>(moves: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_moves(MoveSet::new(moves)?))
    }

    /// Compute the relation matrix for an already validated move set
    pub fn from_moves(moves: MoveSet) -> Self {
        let n = moves.len();
        let half = (n - 1) / 2;
        let mut outcomes = vec![Outcome::Draw; n * n];

        for i in 0..n {
            for offset in 1..n {
                let opponent = (i + offset) % n;
                outcomes[i * n + opponent] = if offset <= half {
                    Outcome::Lose
                } else {
                    Outcome::Win
                };
            }
        }

        debug!(moves = n, "built relation table");
        Self { moves, outcomes }
    }

    /// Outcome of `move_a` against `move_b`, from `move_a`'s point of view
    pub fn compare(&self, move_a: &str, move_b: &str) -> Result<Outcome, GameError> {
        let a = self.moves.index_of(move_a)?;
        let b = self.moves.index_of(move_b)?;
        Ok(self.outcome_at(a, b))
    }

    /// Outcome by move positions
    ///
    /// Panics if either index is out of range.
    pub fn outcome_at(&self, a: usize, b: usize) -> Outcome {
        let n = self.moves.len();
        assert!(a < n && b < n, "move index out of range");
        self.outcomes[a * n + b]
    }

    pub fn moves(&self) -> &MoveSet {
        &self.moves
    }

    /// Each move with its outcomes against every move, in list order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Outcome])> {
        self.moves.iter().zip(self.outcomes.chunks(self.moves.len()))
    }

    /// Moves that `name` wins against
    pub fn beats(&self, name: &str) -> Result<Vec<&str>, GameError> {
        self.opponents_with(name, Outcome::Win)
    }

    /// Moves that win against `name`
    pub fn beaten_by(&self, name: &str) -> Result<Vec<&str>, GameError> {
        self.opponents_with(name, Outcome::Lose)
    }

    fn opponents_with(&self, name: &str, outcome: Outcome) -> Result<Vec<&str>, GameError> {
        let a = self.moves.index_of(name)?;
        Ok(self
            .moves
            .iter()
            .enumerate()
            .filter(|(b, _)| self.outcome_at(a, *b) == outcome)
            .map(|(_, m)| m)
            .collect())
    }
}
