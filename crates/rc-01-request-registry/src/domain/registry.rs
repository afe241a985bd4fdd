//! # Request Registry - Append-Only Request Table
//!
//! Owns every ride request ever created. Records are never removed; the only
//! mutation after creation is the lifecycle flag.
//!
//! ## Invariants Enforced
//!
//! - Ids are assigned from a monotonic counter and never reused
//! - All commitments are exactly 32 bytes (`create()` rejects otherwise)
//! - Deposit is escrowed before the record exists
//! - `Open → Matched` and `Open → Expired` are the only transitions

use super::entities::{
    CreateRequestParams, PendingRequest, RegistryConfig, RequestId, RequestStatus, Timestamp,
};
use super::errors::RegistryError;
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, to_bytes32, EscrowLedger, EventSink, RideEvent};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Request table keyed by `RequestId`.
///
/// `BTreeMap` keeps iteration in ascending id order, which is the canonical
/// order the matching pass relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRegistry {
    config: RegistryConfig,
    requests: BTreeMap<RequestId, PendingRequest>,
    next_id: RequestId,
}

impl RequestRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            requests: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Creates an empty registry with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of requests ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if no request was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Gets a request by id.
    #[must_use]
    pub fn get(&self, request_id: RequestId) -> Option<&PendingRequest> {
        self.requests.get(&request_id)
    }

    /// Ids of all Open requests in ascending order.
    #[must_use]
    pub fn open_request_ids(&self) -> Vec<RequestId> {
        self.requests
            .values()
            .filter(|r| r.is_open())
            .map(|r| r.request_id)
            .collect()
    }

    /// Creates a request, escrowing the rider's deposit.
    ///
    /// # Errors
    /// - `InvalidAddress` if the rider is the zero address
    /// - `InvalidCommitmentLength` if any 32-byte field is malformed
    /// - `InvalidTtl` if ttl is 0 or above `max_ttl`
    /// - `InsufficientDeposit` if below `min_deposit` or the escrow refuses
    pub fn create(
        &mut self,
        params: CreateRequestParams,
        now: Timestamp,
        escrow: &mut dyn EscrowLedger,
        events: &mut dyn EventSink,
    ) -> Result<RequestId, RegistryError> {
        if shared_types::is_zero_address(&params.rider) {
            return Err(RegistryError::InvalidAddress);
        }

        let cell_topic = field32("cell_topic", &params.cell_topic)?;
        let region_topic = field32("region_topic", &params.region_topic)?;
        let params_hash = field32("params_hash", &params.params_hash)?;
        let pickup_commit = field32("pickup_commit", &params.pickup_commit)?;
        let dropoff_commit = field32("dropoff_commit", &params.dropoff_commit)?;

        if params.ttl == 0 || params.ttl > self.config.max_ttl {
            return Err(RegistryError::InvalidTtl {
                ttl: params.ttl,
                max: self.config.max_ttl,
            });
        }

        if params.deposit < self.config.min_deposit {
            return Err(RegistryError::InsufficientDeposit {
                deposit: params.deposit,
                reason: format!("below minimum {}", self.config.min_deposit),
            });
        }

        escrow
            .lock(&params.rider, params.deposit)
            .map_err(|e| RegistryError::InsufficientDeposit {
                deposit: params.deposit,
                reason: e.to_string(),
            })?;

        let request_id = self.next_id;
        self.next_id += 1;

        let request = PendingRequest {
            request_id,
            rider: params.rider,
            cell_topic,
            region_topic,
            params_hash,
            pickup_commit,
            dropoff_commit,
            max_driver_eta: params.max_driver_eta,
            ttl: params.ttl,
            created_at: now,
            expires_at: now.saturating_add(params.ttl),
            deposit: params.deposit,
            status: RequestStatus::Open,
        };
        self.requests.insert(request_id, request);

        info!(
            request_id,
            rider = %short_hex(&params.rider),
            ttl = params.ttl,
            "Ride request created"
        );
        events.emit(RideEvent::RideRequested {
            cell_topic,
            region_topic,
            request_id,
        });

        Ok(request_id)
    }

    /// Expires an Open request whose ttl has elapsed and refunds the rider.
    ///
    /// Idempotent: returns `Ok(false)` when there is nothing to do (still
    /// live, already matched, already expired).
    ///
    /// # Errors
    /// - `RequestNotFound` for an unknown id
    /// - `Escrow` if the refund cannot be paid (state unchanged)
    pub fn expire(
        &mut self,
        request_id: RequestId,
        now: Timestamp,
        escrow: &mut dyn EscrowLedger,
        events: &mut dyn EventSink,
    ) -> Result<bool, RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::RequestNotFound(request_id))?;

        if !request.is_open() || !request.is_expired_at(now) {
            return Ok(false);
        }

        escrow.release(&[(request.rider, request.deposit)])?;
        request.status = RequestStatus::Expired;

        debug!(request_id, now, "Request expired, deposit refunded");
        events.emit(RideEvent::RequestExpired { request_id });
        Ok(true)
    }

    /// Marks an Open request as consumed by the matching pass.
    ///
    /// # Errors
    /// - `RequestNotFound` for an unknown id
    /// - `RequestNotOpen` if the request is not Open
    pub fn mark_matched(&mut self, request_id: RequestId) -> Result<(), RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::RequestNotFound(request_id))?;

        if !request.is_open() {
            return Err(RegistryError::RequestNotOpen(request_id));
        }
        request.status = RequestStatus::Matched;
        Ok(())
    }
}

fn field32(field: &'static str, bytes: &[u8]) -> Result<[u8; 32], RegistryError> {
    to_bytes32(bytes).ok_or(RegistryError::InvalidCommitmentLength {
        field,
        actual: bytes.len(),
    })
}
