//! Key bundle entities.

pub use shared_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// Longest accepted signature over the signed pre-key.
pub const MAX_SIGNATURE_LEN: usize = 96;

/// An identity's published key material.
///
/// The all-zero bundle stands for "nothing published".
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBundle {
    /// Long-term Diffie-Hellman identity key.
    #[serde_as(as = "Hex")]
    pub identity_dh_key: [u8; 32],
    /// Long-term signing key.
    #[serde_as(as = "Hex")]
    pub identity_sign_key: [u8; 32],
    /// Medium-term signed pre-key.
    #[serde_as(as = "Hex")]
    pub signed_pre_key: [u8; 32],
    /// Signature over `signed_pre_key`, 1..=96 bytes, opaque here.
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    /// Expiry timestamp, 0 = never.
    pub expires_at: Timestamp,
    /// Timestamp of the last publish.
    pub updated_at: Timestamp,
}

impl KeyBundle {
    /// Returns true for the zero bundle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updated_at == 0
            && self.identity_dh_key == [0; 32]
            && self.identity_sign_key == [0; 32]
            && self.signed_pre_key == [0; 32]
            && self.signature.is_empty()
    }

    /// Returns true if the bundle has an expiry and it has passed.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

/// Arguments of `PublishKeys`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishKeysParams {
    /// Long-term Diffie-Hellman identity key.
    pub identity_dh_key: [u8; 32],
    /// Long-term signing key.
    pub identity_sign_key: [u8; 32],
    /// Signed pre-key.
    pub signed_pre_key: [u8; 32],
    /// Signature bytes.
    pub signature: Vec<u8>,
    /// Expiry timestamp, 0 = never.
    pub expires_at: Timestamp,
}
