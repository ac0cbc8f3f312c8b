//! Protocol messages.

use super::{RoundId, RoundRecord};
use crate::crypto::{Commitment, Disclosure};
use crate::games::Outcome;
use serde::{Deserialize, Serialize};

/// Published before the human moves; carries the digest only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub round_id: RoundId,
    pub commitment: Commitment,
}

/// Published after the round; enough for any observer to audit it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMessage {
    pub round_id: RoundId,
    pub human_move: String,
    pub outcome: Outcome,
    pub opponent: Disclosure,
}

impl RevealMessage {
    /// Check the opponent's disclosure against its digest
    pub fn verify(&self) -> bool {
        self.opponent.verify()
    }

    /// Check the disclosure against a digest seen earlier, e.g. from a
    /// `CommitMessage`
    pub fn verify_against(&self, published: &CommitMessage) -> bool {
        self.round_id == published.round_id
            && self.opponent.commitment == published.commitment
            && self.verify()
    }
}

impl From<&RoundRecord> for RevealMessage {
    fn from(record: &RoundRecord) -> Self {
        Self {
            round_id: record.round_id,
            human_move: record.human_move.clone(),
            outcome: record.outcome,
            opponent: Disclosure {
                secret_move: record.opponent_move.clone(),
                key: record.key.clone(),
                commitment: record.commitment,
            },
        }
    }
}
