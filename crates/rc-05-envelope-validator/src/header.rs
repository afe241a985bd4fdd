//! Fixed 73-byte ratchet header and the associated-data binding.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{keccak256_concat, Address, Hash, SessionId};

/// Exact header length in bytes.
pub const HEADER_LEN: usize = 73;

/// The only supported envelope version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Decoded ratchet header.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    /// Envelope format version.
    pub version: u8,
    /// Sender's current ratchet public key.
    #[serde_as(as = "Hex")]
    pub dh_pub: [u8; 32],
    /// Length of the previous sending chain.
    pub pn: u32,
    /// Message number in the current chain.
    pub n: u32,
    /// Hash of the associated data bound into the AEAD.
    #[serde_as(as = "Hex")]
    pub ad_hash: Hash,
}

impl EnvelopeHeader {
    /// Creates a version-1 header.
    #[must_use]
    pub fn new(dh_pub: [u8; 32], pn: u32, n: u32, ad_hash: Hash) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            dh_pub,
            pn,
            n,
            ad_hash,
        }
    }

    /// Encodes the header into its 73-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0] = self.version;
        out[1..33].copy_from_slice(&self.dh_pub);
        out[33..37].copy_from_slice(&self.pn.to_be_bytes());
        out[37..41].copy_from_slice(&self.n.to_be_bytes());
        out[41..73].copy_from_slice(&self.ad_hash);
        out
    }

    /// Splits a 73-byte buffer into fields. No version check.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let mut dh_pub = [0u8; 32];
        dh_pub.copy_from_slice(&bytes[1..33]);
        let mut pn = [0u8; 4];
        pn.copy_from_slice(&bytes[33..37]);
        let mut n = [0u8; 4];
        n.copy_from_slice(&bytes[37..41]);
        let mut ad_hash = [0u8; 32];
        ad_hash.copy_from_slice(&bytes[41..73]);

        Self {
            version: bytes[0],
            dh_pub,
            pn: u32::from_be_bytes(pn),
            n: u32::from_be_bytes(n),
            ad_hash,
        }
    }
}

/// Associated data both parties bind into every message of a session:
/// `keccak256(chain_id ‖ session_id ‖ sender ‖ recipient)`, integers big-endian.
#[must_use]
pub fn associated_data_hash(
    chain_id: u64,
    session_id: SessionId,
    sender: &Address,
    recipient: &Address,
) -> Hash {
    keccak256_concat(&[
        &chain_id.to_be_bytes(),
        &session_id.to_be_bytes(),
        sender,
        recipient,
    ])
}
