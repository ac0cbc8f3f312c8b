//! RPS Game Core Library
//!
//! This crate provides the rules, commitment primitives, and round protocol
//! for an N-move generalization of rock-paper-scissors played against an
//! automated opponent that commits to its move before the human chooses.

pub mod crypto;
pub mod error;
pub mod games;
pub mod protocol;

pub use crypto::{verify_commitment, Commitment, CommitmentGenerator, Disclosure, HmacKey};
pub use error::{ConfigIssue, GameError};
pub use games::{MoveSet, Outcome, RelationTable};
pub use protocol::{CommitMessage, RevealMessage, RoundId, RoundRecord, RoundReferee, RoundStage};
