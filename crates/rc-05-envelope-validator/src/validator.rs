//! `validate_envelope`: pure structural check, no state.

use crate::errors::EnvelopeError;
use crate::header::{EnvelopeHeader, ENVELOPE_VERSION, HEADER_LEN};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{keccak256_concat, Hash};

/// Size limits applied on top of the fixed layout. Zero disables a limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeLimits {
    /// Largest accepted header.
    pub max_header_bytes: usize,
    /// Largest accepted ciphertext.
    pub max_ciphertext_bytes: usize,
}

impl Default for EnvelopeLimits {
    fn default() -> Self {
        Self {
            max_header_bytes: HEADER_LEN,
            max_ciphertext_bytes: 64 * 1024,
        }
    }
}

impl EnvelopeLimits {
    /// No configured maxima; only the fixed layout is enforced.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_header_bytes: 0,
            max_ciphertext_bytes: 0,
        }
    }
}

/// Result of a successful validation.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedEnvelope {
    /// Always true; kept so the precompile can return it as-is.
    pub valid: bool,
    /// `keccak256(header ‖ ciphertext)`.
    #[serde_as(as = "Hex")]
    pub envelope_hash: Hash,
    /// Envelope version (1).
    pub version: u8,
    /// Ratchet public key.
    #[serde_as(as = "Hex")]
    pub dh_pub: [u8; 32],
    /// Previous chain length.
    pub pn: u32,
    /// Message number.
    pub n: u32,
    /// Associated-data hash.
    #[serde_as(as = "Hex")]
    pub ad_hash: Hash,
}

/// Hash committed for a posted envelope.
#[must_use]
pub fn envelope_hash(header: &[u8], ciphertext: &[u8]) -> Hash {
    keccak256_concat(&[header, ciphertext])
}

/// Validates an envelope's structure and returns its decoded header.
///
/// # Errors
/// The first failing check, in the order listed in the crate docs.
pub fn validate_envelope(
    header: &[u8],
    ciphertext: &[u8],
    limits: EnvelopeLimits,
) -> Result<ValidatedEnvelope, EnvelopeError> {
    let fixed: &[u8; HEADER_LEN] =
        header.try_into().map_err(|_| EnvelopeError::InvalidHeaderLength {
            actual: header.len(),
        })?;

    if limits.max_header_bytes > 0 && header.len() > limits.max_header_bytes {
        return Err(EnvelopeError::HeaderTooLarge {
            actual: header.len(),
            max: limits.max_header_bytes,
        });
    }
    if ciphertext.is_empty() {
        return Err(EnvelopeError::EmptyCiphertext);
    }
    if limits.max_ciphertext_bytes > 0 && ciphertext.len() > limits.max_ciphertext_bytes {
        return Err(EnvelopeError::CiphertextTooLarge {
            actual: ciphertext.len(),
            max: limits.max_ciphertext_bytes,
        });
    }

    let decoded = EnvelopeHeader::from_bytes(fixed);
    if decoded.version != ENVELOPE_VERSION {
        return Err(EnvelopeError::UnsupportedVersion(decoded.version));
    }

    Ok(ValidatedEnvelope {
        valid: true,
        envelope_hash: envelope_hash(header, ciphertext),
        version: decoded.version,
        dh_pub: decoded.dh_pub,
        pn: decoded.pn,
        n: decoded.n,
        ad_hash: decoded.ad_hash,
    })
}
