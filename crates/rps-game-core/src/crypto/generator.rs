//! Secret move selection for the automated opponent.

use super::{Commitment, HmacKey};
use crate::error::GameError;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Move and key disclosed after the round, together with the digest that was
/// published before it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    pub secret_move: String,
    pub key: HmacKey,
    pub commitment: Commitment,
}

impl Disclosure {
    /// Check the disclosed move and key against the published digest
    pub fn verify(&self) -> bool {
        self.commitment.verify(&self.secret_move, &self.key)
    }
}

/// Picks a secret move and key and commits to them.
///
/// Only `CryptoRng` sources are accepted. A failing source surfaces as
/// `InsufficientEntropy`; there is no fallback generator.
pub struct CommitmentGenerator<R = OsRng> {
    rng: R,
    secret: Option<Disclosure>,
}

impl CommitmentGenerator<OsRng> {
    /// Generator backed by the operating system's secure random source
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for CommitmentGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> CommitmentGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, secret: None }
    }

    /// Sample a fresh key and a fresh move, keep both private, and return the
    /// digest to publish.
    ///
    /// Any previous secret is discarded; keys and moves are never reused.
    pub fn commit<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<Commitment, GameError> {
        if moves.is_empty() {
            return Err(GameError::EmptyMoveSet);
        }
        self.secret = None;

        // Two independent draws: the key never influences the move choice
        let key = HmacKey::generate(&mut self.rng)?;
        let index = sample_index(&mut self.rng, moves.len())?;
        let secret_move = moves[index].as_ref().to_string();

        let commitment = Commitment::new(&secret_move, &key);
        self.secret = Some(Disclosure {
            secret_move,
            key,
            commitment,
        });
        Ok(commitment)
    }

    /// Expose the committed move and key
    pub fn reveal(&self) -> Result<Disclosure, GameError> {
        self.secret.clone().ok_or(GameError::NothingCommitted)
    }

    /// Digest of the current commitment, if any
    pub fn commitment(&self) -> Option<Commitment> {
        self.secret.as_ref().map(|s| s.commitment)
    }
}

/// Uniform index in `0..len` by rejection sampling over `u64` draws
fn sample_index<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Result<usize, GameError> {
    let len = len as u64;
    // Largest multiple of `len` that fits; draws at or above it are redrawn
    let zone = u64::MAX - (u64::MAX % len);
    loop {
        let mut buf = [0u8; 8];
        rng.try_fill_bytes(&mut buf)?;
        let value = u64::from_le_bytes(buf);
        if value < zone {
            return Ok((value % len) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    const MOVES: [&str; 5] = ["rock", "spock", "paper", "lizard", "scissors"];

    /// Secure-source stand-in that always fails
    struct DrainedSource;

    impl RngCore for DrainedSource {
        fn next_u32(&mut self) -> u32 {
            unreachable!("generator must use try_fill_bytes")
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!("generator must use try_fill_bytes")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("generator must use try_fill_bytes")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy source drained",
            )))
        }
    }

    impl CryptoRng for DrainedSource {}

    #[test]
    fn test_commit_then_reveal_verifies() {
        let mut generator = CommitmentGenerator::new();
        let commitment = generator.commit(&MOVES).unwrap();
        let disclosure = generator.reveal().unwrap();

        assert_eq!(disclosure.commitment, commitment);
        assert!(MOVES.contains(&disclosure.secret_move.as_str()));
        assert!(disclosure.verify());
    }

    #[test]
    fn test_reveal_before_commit() {
        let generator = CommitmentGenerator::new();
        assert_eq!(generator.reveal().unwrap_err(), GameError::NothingCommitted);
        assert!(generator.commitment().is_none());
    }

    #[test]
    fn test_empty_move_set() {
        let mut generator = CommitmentGenerator::new();
        let empty: [&str; 0] = [];
        assert_eq!(generator.commit(&empty).unwrap_err(), GameError::EmptyMoveSet);
    }

    #[test]
    fn test_failing_source_is_fatal() {
        let mut generator = CommitmentGenerator::with_rng(DrainedSource);
        let err = generator.commit(&MOVES).unwrap_err();

        assert!(matches!(err, GameError::InsufficientEntropy(_)));
        assert_eq!(generator.reveal().unwrap_err(), GameError::NothingCommitted);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = CommitmentGenerator::with_rng(StdRng::seed_from_u64(7));
        let mut b = CommitmentGenerator::with_rng(StdRng::seed_from_u64(7));
        assert_eq!(a.commit(&MOVES).unwrap(), b.commit(&MOVES).unwrap());
        assert_eq!(a.reveal().unwrap(), b.reveal().unwrap());
    }

    #[test]
    fn test_recommit_replaces_secret() {
        let mut generator = CommitmentGenerator::new();
        let first = generator.commit(&MOVES).unwrap();
        let first_key = generator.reveal().unwrap().key;
        let second = generator.commit(&MOVES).unwrap();
        let disclosure = generator.reveal().unwrap();

        assert_ne!(first, second);
        assert_ne!(first_key, disclosure.key);
        assert_eq!(disclosure.commitment, second);
    }

    #[test]
    fn test_moves_are_uniform_and_keys_never_repeat() {
        const TRIALS: usize = 5_000;
        let mut generator = CommitmentGenerator::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut keys = HashSet::new();

        for _ in 0..TRIALS {
            generator.commit(&MOVES).unwrap();
            let disclosure = generator.reveal().unwrap();
            *counts.entry(disclosure.secret_move).or_default() += 1;
            assert!(keys.insert(disclosure.key), "key repeated");
        }

        // Chi-square with 4 degrees of freedom; 40 is far beyond p = 1e-6
        let expected = TRIALS as f64 / MOVES.len() as f64;
        let chi_square: f64 = MOVES
            .iter()
            .map(|m| {
                let observed = *counts.get(*m).unwrap_or(&0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();
        assert!(chi_square < 40.0, "chi-square too large: {chi_square}");
    }

    #[test]
    fn test_digest_does_not_leak_move() {
        // Top-bit frequency of the digest is ~1/2 regardless of the move
        const TRIALS: usize = 3_000;
        let mut generator = CommitmentGenerator::new();
        let mut per_move: HashMap<String, (usize, usize)> = HashMap::new();

        for _ in 0..TRIALS {
            let commitment = generator.commit(&MOVES[..3]).unwrap();
            let secret_move = generator.reveal().unwrap().secret_move;
            let entry = per_move.entry(secret_move).or_default();
            entry.0 += 1;
            if commitment.as_bytes()[0] & 0x80 != 0 {
                entry.1 += 1;
            }
        }

        assert_eq!(per_move.len(), 3);
        for (name, (total, high)) in per_move {
            let ratio = high as f64 / total as f64;
            assert!((ratio - 0.5).abs() < 0.1, "{name}: top-bit ratio {ratio}");
        }
    }

    #[test]
    fn test_sample_index_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in 1..20 {
            for _ in 0..50 {
                assert!(sample_index(&mut rng, len).unwrap() < len);
            }
        }
    }
}
