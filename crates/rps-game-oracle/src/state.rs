//! Oracle state: the shared rules and the rounds still held for play or audit.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rps_game_core::{CommitMessage, RelationTable, RevealMessage, RoundId, RoundReferee};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::AppError;

/// Random sources a shared oracle can hand to its referees
pub trait RoundRng: RngCore + CryptoRng + Send + Sync + 'static {}

impl<T: RngCore + CryptoRng + Send + Sync + 'static> RoundRng for T {}

/// How many rounds are held and for how long
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retention {
    /// Live rounds at once; creating more fails until some expire
    pub max_rounds: usize,
    /// Idle time after which a round is dropped. Playing a round restarts it,
    /// so a resolved round stays auditable for a full window.
    pub window: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            max_rounds: 10_000,
            window: Duration::from_secs(600),
        }
    }
}

struct HeldRound<R> {
    referee: RoundReferee<R>,
    touched_at: Instant,
}

impl<R> HeldRound<R> {
    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.touched_at) >= window
    }
}

pub struct OracleState<R = OsRng> {
    table: Arc<RelationTable>,
    retention: Retention,
    make_rng: fn() -> R,
    rounds: RwLock<HashMap<RoundId, HeldRound<R>>>,
}

impl OracleState<OsRng> {
    pub fn new(table: RelationTable, retention: Retention) -> Self {
        Self::with_rng_source(table, retention, || OsRng)
    }
}

impl<R: RoundRng> OracleState<R> {
    /// Each new round draws its key and move from a source made by `make_rng`
    pub fn with_rng_source(
        table: RelationTable,
        retention: Retention,
        make_rng: fn() -> R,
    ) -> Self {
        Self {
            table: Arc::new(table),
            retention,
            make_rng,
            rounds: RwLock::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &Arc<RelationTable> {
        &self.table
    }

    /// Rounds currently held, expired ones included until the next write
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Commit to a move for a new round and hold it.
    ///
    /// Nothing is stored when the oracle is full or the commit fails.
    pub fn open_round(&self) -> Result<CommitMessage, AppError> {
        let now = Instant::now();
        let mut rounds = self.write();
        self.evict_expired(&mut rounds, now);

        if rounds.len() >= self.retention.max_rounds {
            return Err(AppError::AtCapacity(self.retention.max_rounds));
        }

        let mut referee = RoundReferee::with_rng(self.table.clone(), (self.make_rng)());
        let commitment = referee.commit()?;
        let round_id = referee.id();

        rounds.insert(
            round_id,
            HeldRound {
                referee,
                touched_at: now,
            },
        );
        info!(%round_id, held = rounds.len(), "created round");

        Ok(CommitMessage {
            round_id,
            commitment,
        })
    }

    /// Read a held round
    pub fn inspect<T>(
        &self,
        round_id: RoundId,
        f: impl FnOnce(&RoundReferee<R>) -> T,
    ) -> Result<T, AppError> {
        let rounds = self.read();
        rounds
            .get(&round_id)
            .filter(|held| !held.expired(Instant::now(), self.retention.window))
            .map(|held| f(&held.referee))
            .ok_or(AppError::RoundNotFound(round_id))
    }

    /// Judge the human's move and restart the round's retention window
    pub fn play(&self, round_id: RoundId, human_move: &str) -> Result<RevealMessage, AppError> {
        let now = Instant::now();
        let mut rounds = self.write();
        self.evict_expired(&mut rounds, now);

        let held = rounds
            .get_mut(&round_id)
            .ok_or(AppError::RoundNotFound(round_id))?;
        let reveal = RevealMessage::from(held.referee.play(human_move)?);
        held.touched_at = now;

        info!(%round_id, outcome = %reveal.outcome.as_str(), "resolved round");
        Ok(reveal)
    }

    fn evict_expired(&self, rounds: &mut HashMap<RoundId, HeldRound<R>>, now: Instant) {
        let before = rounds.len();
        rounds.retain(|_, held| !held.expired(now, self.retention.window));

        let evicted = before - rounds.len();
        if evicted > 0 {
            debug!(evicted, held = rounds.len(), "evicted expired rounds");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<RoundId, HeldRound<R>>> {
        self.rounds.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RoundId, HeldRound<R>>> {
        self.rounds.write().unwrap_or_else(PoisonError::into_inner)
    }
}
