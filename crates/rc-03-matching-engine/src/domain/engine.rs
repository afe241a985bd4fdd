//! # Matching Pass
//!
//! `run_round` walks the Open requests in ascending id and decides each one
//! independently: expire, defer or match.

use super::entities::{MatchRecord, MatchingConfig, RequestId, RoundOutcome};
use super::selection::select_winner;
use rc_01_request_registry::{PendingRequest, RequestRegistry};
use rc_02_commit_store::CommitStore;
use rc_04_session_manager::SessionManager;
use shared_types::{short_hex, EscrowLedger, EventSink, RideEvent, Timestamp};
use tracing::{debug, info, warn};

/// The once-per-round matching pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Runs the matching pass for the round at `now`.
    pub fn run_round(
        &self,
        now: Timestamp,
        requests: &mut RequestRegistry,
        commits: &CommitStore,
        sessions: &mut SessionManager,
        escrow: &mut dyn EscrowLedger,
        events: &mut dyn EventSink,
    ) -> RoundOutcome {
        let mut outcome = RoundOutcome::default();

        for request_id in requests.open_request_ids() {
            let Some(request) = requests.get(request_id).cloned() else {
                continue;
            };

            if request.is_expired_at(now) {
                match requests.expire(request_id, now, escrow, events) {
                    Ok(_) => outcome.expired.push(request_id),
                    Err(e) => {
                        warn!(request_id, error = %e, "Failed to expire request");
                        outcome.deferred.push(request_id);
                    }
                }
                continue;
            }

            let cap = self.config.max_matches_per_round;
            if cap > 0 && outcome.matched.len() >= cap {
                outcome.deferred.push(request_id);
                continue;
            }

            match self.try_match(&request, now, requests, commits, sessions, events) {
                Some(record) => outcome.matched.push(record),
                None => outcome.deferred.push(request_id),
            }
        }

        info!(
            now,
            matched = outcome.matched.len(),
            expired = outcome.expired.len(),
            deferred = outcome.deferred.len(),
            "Matching pass complete"
        );
        outcome
    }

    /// Matches one live request, or returns None to defer it.
    fn try_match(
        &self,
        request: &PendingRequest,
        now: Timestamp,
        requests: &mut RequestRegistry,
        commits: &CommitStore,
        sessions: &mut SessionManager,
        events: &mut dyn EventSink,
    ) -> Option<MatchRecord> {
        let request_id: RequestId = request.request_id;
        let window_closes = request
            .created_at
            .saturating_add(self.config.effective_window(request.ttl));
        if now < window_closes {
            debug!(request_id, window_closes, "Commit window open");
            return None;
        }

        let candidates = commits.commits_for(request_id);
        let Some(winner) = select_winner(&candidates, request.max_driver_eta) else {
            debug!(
                request_id,
                commits = candidates.len(),
                "No eligible commit"
            );
            return None;
        };

        if let Err(e) = requests.mark_matched(request_id) {
            warn!(request_id, error = %e, "Failed to mark request matched");
            return None;
        }
        let session_id = sessions.open(request_id, request.rider, winner.driver, now);

        info!(
            request_id,
            session_id,
            driver = %short_hex(&winner.driver),
            eta = winner.eta,
            "Request matched"
        );
        events.emit(RideEvent::Matched {
            session_id,
            request_id,
            rider: request.rider,
            driver: winner.driver,
        });

        Some(MatchRecord {
            request_id,
            session_id,
            driver: winner.driver,
            eta: winner.eta,
        })
    }
}
