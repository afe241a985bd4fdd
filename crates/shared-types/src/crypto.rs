//! # Hashing
//!
//! Keccak-256 helpers. Pure functions, no side effects.

use crate::entities::Hash;
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Computes Keccak-256 over the concatenation of `parts`.
#[must_use]
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hiding commitment to a value: `keccak256(value ‖ salt)`.
///
/// Clients publish this when creating a request and open it at reveal time.
#[must_use]
pub fn commitment(value: &[u8], salt: &[u8]) -> Hash {
    keccak256_concat(&[value, salt])
}

/// Returns true if `(value, salt)` opens `expected`.
#[must_use]
pub fn verify_commitment(value: &[u8], salt: &[u8], expected: &Hash) -> bool {
    commitment(value, salt) == *expected
}
