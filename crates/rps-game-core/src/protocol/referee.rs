//! One round against the automated opponent.
//!
//! ```text
//! AwaitingCommitment --commit()--> AwaitingHumanMove --play(move)--> Resolved
//! ```
//!
//! The digest is available from `AwaitingHumanMove` on; the opponent's move and
//! key only once the round is `Resolved`. A new round needs a new referee.

use super::{RoundId, RoundStage};
use crate::crypto::{Commitment, CommitmentGenerator, HmacKey};
use crate::error::GameError;
use crate::games::{Outcome, RelationTable};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Everything needed to display and audit a resolved round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_id: RoundId,
    pub human_move: String,
    pub opponent_move: String,
    /// From the human's point of view
    pub outcome: Outcome,
    pub key: HmacKey,
    pub commitment: Commitment,
}

impl RoundRecord {
    /// Recompute the digest from the disclosed move and key
    pub fn verify(&self) -> bool {
        self.commitment.verify(&self.opponent_move, &self.key)
    }
}

enum Phase {
    AwaitingCommitment,
    AwaitingHumanMove(Commitment),
    Resolved(RoundRecord),
}

/// Drives a single round: commit, accept the human move, resolve and disclose
pub struct RoundReferee<R = OsRng> {
    id: RoundId,
    table: Arc<RelationTable>,
    generator: CommitmentGenerator<R>,
    phase: Phase,
}

impl RoundReferee<OsRng> {
    pub fn new(table: Arc<RelationTable>) -> Self {
        Self::with_rng(table, OsRng)
    }
}

impl<R: RngCore + CryptoRng> RoundReferee<R> {
    pub fn with_rng(table: Arc<RelationTable>, rng: R) -> Self {
        Self {
            id: RoundId::random(),
            table,
            generator: CommitmentGenerator::with_rng(rng),
            phase: Phase::AwaitingCommitment,
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn table(&self) -> &RelationTable {
        &self.table
    }

    pub fn stage(&self) -> RoundStage {
        match self.phase {
            Phase::AwaitingCommitment => RoundStage::AwaitingCommitment,
            Phase::AwaitingHumanMove(_) => RoundStage::AwaitingHumanMove,
            Phase::Resolved(_) => RoundStage::Resolved,
        }
    }

    /// Published digest, once committed
    pub fn commitment(&self) -> Option<Commitment> {
        match &self.phase {
            Phase::AwaitingCommitment => None,
            Phase::AwaitingHumanMove(commitment) => Some(*commitment),
            Phase::Resolved(record) => Some(record.commitment),
        }
    }

    /// Outcome and disclosure, once resolved
    pub fn record(&self) -> Option<&RoundRecord> {
        match &self.phase {
            Phase::Resolved(record) => Some(record),
            _ => None,
        }
    }

    /// Have the opponent commit to a secret move; returns the digest to publish
    pub fn commit(&mut self) -> Result<Commitment, GameError> {
        self.expect_stage(RoundStage::AwaitingCommitment)?;

        let commitment = self.generator.commit(self.table.moves().as_slice())?;
        self.phase = Phase::AwaitingHumanMove(commitment);

        info!(round = %self.id, %commitment, "opponent committed");
        Ok(commitment)
    }

    /// Accept the human's move, judge it against the committed move, and
    /// disclose the key
    pub fn play(&mut self, human_move: &str) -> Result<&RoundRecord, GameError> {
        self.expect_stage(RoundStage::AwaitingHumanMove)?;
        // Reject unknown moves without leaving the current stage
        self.table.moves().index_of(human_move)?;

        let disclosure = self.generator.reveal()?;
        let outcome = self.table.compare(human_move, &disclosure.secret_move)?;

        info!(
            round = %self.id,
            human_move,
            opponent_move = %disclosure.secret_move,
            %outcome,
            "round resolved"
        );

        self.phase = Phase::Resolved(RoundRecord {
            round_id: self.id,
            human_move: human_move.to_string(),
            opponent_move: disclosure.secret_move,
            outcome,
            key: disclosure.key,
            commitment: disclosure.commitment,
        });

        match &self.phase {
            Phase::Resolved(record) => Ok(record),
            _ => unreachable!("phase was just set to resolved"),
        }
    }

    fn expect_stage(&self, expected: RoundStage) -> Result<(), GameError> {
        let actual = self.stage();
        if actual == expected {
            Ok(())
        } else {
            Err(GameError::WrongStage { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_commitment;

    fn classic() -> Arc<RelationTable> {
        Arc::new(RelationTable::build(["rock", "paper", "scissors"]).unwrap())
    }

    #[test]
    fn test_full_round() {
        let table = classic();
        let mut referee = RoundReferee::new(table.clone());
        assert_eq!(referee.stage(), RoundStage::AwaitingCommitment);
        assert!(referee.commitment().is_none());

        let published = referee.commit().unwrap();
        assert_eq!(referee.stage(), RoundStage::AwaitingHumanMove);
        assert_eq!(referee.commitment(), Some(published));
        assert!(referee.record().is_none());

        let record = referee.play("rock").unwrap().clone();
        assert_eq!(referee.stage(), RoundStage::Resolved);
        assert_eq!(record.commitment, published);
        assert_eq!(record.human_move, "rock");
        assert_eq!(
            record.outcome,
            table.compare("rock", &record.opponent_move).unwrap()
        );
        assert!(record.verify());
        assert!(verify_commitment(&record.opponent_move, &record.key, &published));
    }

    #[test]
    fn test_play_before_commit() {
        let mut referee = RoundReferee::new(classic());
        assert_eq!(
            referee.play("rock").unwrap_err(),
            GameError::WrongStage {
                expected: RoundStage::AwaitingHumanMove,
                actual: RoundStage::AwaitingCommitment,
            }
        );
    }

    #[test]
    fn test_double_commit_rejected() {
        let mut referee = RoundReferee::new(classic());
        let first = referee.commit().unwrap();
        assert!(matches!(
            referee.commit().unwrap_err(),
            GameError::WrongStage { .. }
        ));
        assert_eq!(referee.commitment(), Some(first));
    }

    #[test]
    fn test_resolved_round_is_terminal() {
        let mut referee = RoundReferee::new(classic());
        referee.commit().unwrap();
        let record = referee.play("paper").unwrap().clone();

        assert_eq!(
            referee.play("rock").unwrap_err(),
            GameError::WrongStage {
                expected: RoundStage::AwaitingHumanMove,
                actual: RoundStage::Resolved,
            }
        );
        assert_eq!(referee.record(), Some(&record));
    }

    #[test]
    fn test_unknown_human_move_keeps_stage() {
        let mut referee = RoundReferee::new(classic());
        referee.commit().unwrap();

        assert_eq!(
            referee.play("spock").unwrap_err(),
            GameError::UnknownMove("spock".to_string())
        );
        assert_eq!(referee.stage(), RoundStage::AwaitingHumanMove);
        assert!(referee.play("scissors").unwrap().verify());
    }

    #[test]
    fn test_rounds_are_independent() {
        let table = classic();
        let mut first = RoundReferee::new(table.clone());
        let mut second = RoundReferee::new(table);

        assert_ne!(first.id(), second.id());
        assert_ne!(first.commit().unwrap(), second.commit().unwrap());
        let key_a = first.play("rock").unwrap().key.clone();
        let key_b = second.play("rock").unwrap().key.clone();
        assert_ne!(key_a, key_b);
    }
}
