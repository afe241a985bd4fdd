//! Driver commit record.

pub use shared_types::{Address, Hash, RequestId, Timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A driver's sealed acceptance of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverCommit {
    /// Request committed to.
    pub request_id: RequestId,
    /// Committing driver.
    pub driver: Address,
    /// Opaque commitment, exactly 32 bytes.
    pub commitment: Hash,
    /// Claimed time to pickup.
    pub eta: u32,
    /// Round of the latest submission.
    pub submitted_at: Timestamp,
}

impl DriverCommit {
    /// Canonical order: ascending `submitted_at`, ties by driver address.
    #[must_use]
    pub fn submission_order(&self, other: &Self) -> Ordering {
        self.submitted_at
            .cmp(&other.submitted_at)
            .then_with(|| self.driver.cmp(&other.driver))
    }
}
