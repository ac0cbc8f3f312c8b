//! Cryptographic primitives for the opponent's commit-reveal proof.
//!
//! This module provides:
//! - HmacKey, the per-round secret key
//! - Commitment, the HMAC-SHA3-256 digest published before the human moves
//! - CommitmentGenerator, which samples the secret move and key

mod commitment;
mod generator;
mod key;

pub use commitment::{verify_commitment, Commitment};
pub use generator::{CommitmentGenerator, Disclosure};
pub use key::HmacKey;

/// Hex (de)serialization for fixed 32-byte values
mod hex_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        super::decode_32(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Decode exactly 32 bytes of hex
fn decode_32(hex_str: &str) -> Result<[u8; 32], hex::FromHexError> {
    let mut arr = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut arr)?;
    Ok(arr)
}
