//! Session Manager configuration.

use rc_05_envelope_validator::EnvelopeLimits;
use serde::{Deserialize, Serialize};
use shared_types::U256;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// How a cancelled session's deposit is split.
///
/// The rider receives `deposit * rider_bps / 10_000`; the driver receives the
/// remainder, so nothing is ever lost to rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelPolicy {
    /// Rider share when cancelled before activation.
    pub pending_rider_bps: u64,
    /// Rider share when cancelled after activation.
    pub active_rider_bps: u64,
}

impl Default for CancelPolicy {
    fn default() -> Self {
        Self {
            pending_rider_bps: 10_000,
            active_rider_bps: 5_000,
        }
    }
}

impl CancelPolicy {
    /// Splits `deposit` into `(rider_share, driver_share)`.
    #[must_use]
    pub fn split(deposit: U256, rider_bps: u64) -> (U256, U256) {
        let bps = rider_bps.min(BPS_DENOMINATOR);
        let denominator = U256::from(BPS_DENOMINATOR);
        let rider = match deposit.checked_mul(U256::from(bps)) {
            Some(scaled) => scaled / denominator,
            None => deposit / denominator * U256::from(bps),
        };
        (rider, deposit - rider)
    }
}

/// Session Manager configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Deposit split on cancellation.
    pub cancel_policy: CancelPolicy,
    /// Limits applied to posted envelopes.
    pub envelope_limits: EnvelopeLimits,
    /// Largest revealed coordinate in bytes.
    pub max_coord_bytes: usize,
    /// Require `ad_hash` to bind chain, session and direction.
    pub require_ad_binding: bool,
    /// Chain id mixed into the associated data.
    pub chain_id: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cancel_policy: CancelPolicy::default(),
            envelope_limits: EnvelopeLimits::default(),
            max_coord_bytes: 256,
            require_ad_binding: false,
            chain_id: 1,
        }
    }
}
