//! Core domain entities for the Request Registry.
//!
//! A request carries only hiding commitments to its locations. The clear
//! coordinates are revealed later, to the matched session only.

pub use shared_types::{Address, Hash, RequestId, Timestamp, Topic, U256};
use serde::{Deserialize, Serialize};

/// Lifecycle flag of a request. The only mutable part of the record.
///
/// ```text
/// [Open] ──match──→ [Matched]
///    │
///    └──── ttl elapsed ──→ [Expired]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Accepting driver commits.
    #[default]
    Open,
    /// Consumed by the matching pass; a session owns the outcome.
    Matched,
    /// Lapsed without a match; deposit refunded.
    Expired,
}

/// An archived or live ride request.
///
/// INVARIANT: every 32-byte field is exactly 32 bytes (enforced by the type).
/// INVARIANT: `expires_at = created_at + ttl` with `ttl >= 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Monotonic identifier.
    pub request_id: RequestId,
    /// Account that opened the request and funded the deposit.
    pub rider: Address,
    /// Fine-grained discovery topic.
    pub cell_topic: Topic,
    /// Coarse discovery topic.
    pub region_topic: Topic,
    /// Commitment to the ride parameters.
    pub params_hash: Hash,
    /// `keccak256(pickup ‖ salt)`.
    pub pickup_commit: Hash,
    /// `keccak256(dropoff ‖ salt)`.
    pub dropoff_commit: Hash,
    /// Largest ETA a driver may commit with and still be eligible.
    pub max_driver_eta: u32,
    /// Rounds until expiry.
    pub ttl: u64,
    /// Round the request was admitted in.
    pub created_at: Timestamp,
    /// First round in which the request counts as expired.
    pub expires_at: Timestamp,
    /// Escrowed value.
    pub deposit: U256,
    /// Lifecycle flag.
    pub status: RequestStatus,
}

impl PendingRequest {
    /// Returns true while the request accepts commits and can be matched.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    /// Live window is `[created_at, expires_at)`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Arguments of `CreateRequest`, exactly as submitted by the client.
///
/// Byte fields are unchecked slices here; the registry validates lengths
/// before any state is touched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequestParams {
    /// Requesting account.
    pub rider: Address,
    /// Cell topic (32 bytes).
    pub cell_topic: Vec<u8>,
    /// Region topic (32 bytes).
    pub region_topic: Vec<u8>,
    /// Parameter commitment (32 bytes).
    pub params_hash: Vec<u8>,
    /// Pickup commitment (32 bytes).
    pub pickup_commit: Vec<u8>,
    /// Dropoff commitment (32 bytes).
    pub dropoff_commit: Vec<u8>,
    /// Largest acceptable driver ETA.
    pub max_driver_eta: u32,
    /// Rounds until expiry.
    pub ttl: u64,
    /// Value to escrow.
    pub deposit: U256,
}

/// Request Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Longest ttl a rider may ask for, in rounds.
    pub max_ttl: u64,
    /// Smallest deposit accepted.
    pub min_deposit: U256,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_ttl: 14_400, // ~48h of 12s rounds
            min_deposit: U256::zero(),
        }
    }
}
