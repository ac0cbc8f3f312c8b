//! Validated, ordered list of move names.

use crate::error::{ConfigIssue, GameError};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Ordered list of distinct move names with an odd length of at least 3.
///
/// The order defines the circular offsets used by the relation table, so it is
/// fixed once the set is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl MoveSet {
    /// Validate and build a move set
    pub fn new<I, S>(names: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.len() < 3 {
            return Err(ConfigIssue::TooFewMoves(names.len()).into());
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ConfigIssue::DuplicateMove(name.clone()).into());
            }
        }

        if names.len() % 2 == 0 {
            return Err(ConfigIssue::EvenMoveCount(names.len()).into());
        }

        Ok(Self { names, index })
    }

    /// Number of moves (always odd, at least 3)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a valid set has at least 3 moves
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a move in the configured order
    pub fn index_of(&self, name: &str) -> Result<usize, GameError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownMove(name.to_string()))
    }

    /// Move at a position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl Serialize for MoveSet {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.names.serialize(s)
    }
}
