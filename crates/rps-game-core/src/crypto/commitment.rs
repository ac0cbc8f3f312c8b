//! Commitment = HMAC-SHA3-256(key, len(move) || move)

use super::HmacKey;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;

type HmacSha3 = Hmac<Sha3_256>;

fn keyed_mac(move_name: &str, key: &HmacKey) -> HmacSha3 {
    let mut mac =
        <HmacSha3 as Mac>::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    // Length prefix keeps one move name from being a prefix-collision of another
    mac.update(&(move_name.len() as u64).to_be_bytes());
    mac.update(move_name.as_bytes());
    mac
}

/// Digest published before the human chooses a move
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(#[serde(with = "super::hex_serde")] [u8; 32]);

impl Commitment {
    /// Commit to a move under a key
    pub fn new(move_name: &str, key: &HmacKey) -> Self {
        Self(keyed_mac(move_name, key).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given move and key produce this commitment
    pub fn verify(&self, move_name: &str, key: &HmacKey) -> bool {
        keyed_mac(move_name, key).verify_slice(&self.0).is_ok()
    }
}

/// Recompute the digest for a disclosed move and key and compare it to the
/// one published before the round
pub fn verify_commitment(move_name: &str, key: &HmacKey, digest: &Commitment) -> bool {
    digest.verify(move_name, key)
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::decode_32(s).map(Self)
    }
}
