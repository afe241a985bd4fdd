//! Solidity-facing interface of the ride precompiles.
//!
//! Selectors, calldata decoding and return encoding come from the `sol!`
//! bindings below.

use alloy_core::primitives::{FixedBytes, U256};
use alloy_core::sol;

sol! {
    /// Envelope validator at `0x…0a01`.
    function validateEnvelope(
        bytes header,
        bytes ciphertext,
        uint256 maxHeader,
        uint256 maxCiphertext
    ) returns (
        bool valid,
        bytes32 envelopeHash,
        uint8 version,
        bytes32 dhPub,
        uint32 pn,
        uint32 n,
        bytes32 adHash
    );

    /// Publishes the caller's bundle at `0x…0a02`.
    function publishKeys(
        bytes32 identityDhKey,
        bytes32 identitySignKey,
        bytes32 signedPreKey,
        bytes signature,
        uint64 expiresAt
    ) returns (bool ok);

    /// Reads `owner`'s bundle at `0x…0a02`.
    function getKeys(address owner) returns (
        bytes32 identityDhKey,
        bytes32 identitySignKey,
        bytes32 signedPreKey,
        bytes signature,
        uint64 expiresAt,
        uint64 updatedAt
    );
}

/// Converts a ledger hash into an ABI `bytes32`.
#[must_use]
pub fn word(bytes: [u8; 32]) -> FixedBytes<32> {
    FixedBytes(bytes)
}

/// Clamps an ABI `uint256` to `usize`.
#[must_use]
pub fn usize_saturating(value: U256) -> usize {
    value.saturating_to()
}
