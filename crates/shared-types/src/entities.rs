//! # Core Domain Primitives
//!
//! Fixed-width identifiers and the round clock shared by every component.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Hash`, `Topic`
//! - **Table keys**: `RequestId`, `SessionId`
//! - **Clock**: `BlockContext`, `Timestamp`

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for deposit and payout amounts
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (Keccak-256).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style account address.
pub type Address = [u8; 20];

/// A 32-byte discovery topic, opaque to the core.
pub type Topic = [u8; 32];

/// The zero address. Never a valid rider, driver or key owner.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Length of every commitment, topic and key field.
pub const COMMITMENT_LEN: usize = 32;

/// Returns true if the address is all zeroes.
#[must_use]
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

/// Converts a slice into a 32-byte array. Returns None on any other length.
#[must_use]
pub fn to_bytes32(slice: &[u8]) -> Option<[u8; 32]> {
    <[u8; 32]>::try_from(slice).ok()
}

// =============================================================================
// CLUSTER B: TABLE KEYS
// =============================================================================

/// Monotonic ride request identifier. Starts at 1, never reused.
pub type RequestId = u64;

/// Monotonic session identifier. Starts at 1, never reused.
pub type SessionId = u64;

// =============================================================================
// CLUSTER C: CLOCK
// =============================================================================

/// Round-clock value. For requests and sessions this is the block height,
/// for key bundles the block timestamp.
pub type Timestamp = u64;

/// The fixed clock of the round being executed.
///
/// Every node replaying the round sees the same context, so comparisons
/// against it are deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Block height of the round.
    pub height: u64,
    /// Block timestamp (seconds) fixed by the proposer.
    pub timestamp: u64,
}

impl BlockContext {
    /// Creates a new block context.
    #[must_use]
    pub const fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.height, self.timestamp)
    }
}

/// Short hex form of an address for log fields (`0xaabbccdd..`).
#[must_use]
pub fn short_hex(bytes: &[u8]) -> String {
    let head = &bytes[..bytes.len().min(4)];
    format!("0x{}..", hex::encode(head))
}
