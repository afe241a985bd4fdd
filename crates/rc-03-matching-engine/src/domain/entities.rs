//! Matching configuration and round outcome.

pub use shared_types::{Address, RequestId, SessionId};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// Matching Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Rounds after creation during which commits are collected.
    pub commit_window: u64,
    /// Maximum matches per round, 0 = unbounded.
    pub max_matches_per_round: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            commit_window: 2,
            max_matches_per_round: 0,
        }
    }
}

impl MatchingConfig {
    /// Commit window for a request, clamped so it closes before expiry.
    #[must_use]
    pub fn effective_window(&self, ttl: u64) -> u64 {
        self.commit_window.min(ttl.saturating_sub(1))
    }
}

/// One pairing made by the matching pass.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// The consumed request.
    pub request_id: RequestId,
    /// The session opened for it.
    pub session_id: SessionId,
    /// Winning driver.
    #[serde_as(as = "Hex")]
    pub driver: Address,
    /// Winning ETA.
    pub eta: u32,
}

/// Everything the matching pass did in one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Requests paired this round, in id order.
    pub matched: Vec<MatchRecord>,
    /// Requests expired this round, in id order.
    pub expired: Vec<RequestId>,
    /// Requests left Open for a later round, in id order.
    pub deferred: Vec<RequestId>,
}
