//! # Commit Store
//!
//! Table of driver commits keyed by `(request_id, driver)`.
//!
//! Validation order is structural first (commitment length, driver address),
//! then state (request exists, not expired, still open, not the rider's own).
//! A rejected submission never touches the table.

use super::entities::{Address, DriverCommit, RequestId, Timestamp};
use super::errors::CommitError;
use rc_01_request_registry::RequestRegistry;
use serde::{Deserialize, Serialize};
use shared_types::{is_zero_address, short_hex, to_bytes32, EventSink, RideEvent};
use std::collections::BTreeMap;
use tracing::debug;

/// Commit table. The composite key gives canonical iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStore {
    commits: BTreeMap<(RequestId, Address), DriverCommit>,
}

impl CommitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of live commit records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns true if no commit was ever stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Gets the commit of `driver` on `request_id`.
    #[must_use]
    pub fn get(&self, request_id: RequestId, driver: &Address) -> Option<&DriverCommit> {
        self.commits.get(&(request_id, *driver))
    }

    /// Records or replaces a driver's commit on an open request.
    ///
    /// # Errors
    /// - `InvalidDriverCommit` if the commitment is not 32 bytes
    /// - `InvalidAddress` if the driver is the zero address
    /// - `RequestNotFound`, `RequestExpired`, `RequestNotOpen`, `SelfCommit`
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        requests: &RequestRegistry,
        request_id: RequestId,
        driver: Address,
        commitment: &[u8],
        eta: u32,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), CommitError> {
        let commitment = to_bytes32(commitment).ok_or(CommitError::InvalidDriverCommit {
            actual: commitment.len(),
        })?;
        if is_zero_address(&driver) {
            return Err(CommitError::InvalidAddress);
        }

        let request = requests
            .get(request_id)
            .ok_or(CommitError::RequestNotFound(request_id))?;
        if request.is_expired_at(now) {
            return Err(CommitError::RequestExpired(request_id));
        }
        if !request.is_open() {
            return Err(CommitError::RequestNotOpen(request_id));
        }
        if request.rider == driver {
            return Err(CommitError::SelfCommit(request_id));
        }

        let replaced = self
            .commits
            .insert(
                (request_id, driver),
                DriverCommit {
                    request_id,
                    driver,
                    commitment,
                    eta,
                    submitted_at: now,
                },
            )
            .is_some();

        debug!(
            request_id,
            driver = %short_hex(&driver),
            eta,
            replaced,
            "Driver commit stored"
        );
        events.emit(RideEvent::DriverAcceptCommitted { request_id, driver });
        Ok(())
    }

    /// All commits on a request, ascending `submitted_at`, ties by driver.
    #[must_use]
    pub fn commits_for(&self, request_id: RequestId) -> Vec<DriverCommit> {
        let mut commits: Vec<DriverCommit> = self
            .commits
            .range((request_id, [0u8; 20])..=(request_id, [0xFF; 20]))
            .map(|(_, commit)| commit.clone())
            .collect();
        commits.sort_by(DriverCommit::submission_order);
        commits
    }
}
