//! # Session Manager
//!
//! Session table plus every operation that moves a session through its
//! lifecycle. Each operation validates fully before mutating, so a rejected
//! call leaves the table and the escrow untouched.

use super::config::{CancelPolicy, SessionConfig};
use super::entities::{Address, Hash, RequestId, Session, SessionId, SessionStatus, Timestamp};
use super::errors::SessionError;
use rc_01_request_registry::{PendingRequest, RequestRegistry};
use rc_05_envelope_validator::{associated_data_hash, validate_envelope};
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, verify_commitment, EscrowLedger, EventSink, LocationKind, RideEvent};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Session table keyed by `SessionId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionManager {
    config: SessionConfig,
    sessions: BTreeMap<SessionId, Session>,
    next_id: SessionId,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionManager {
    /// Creates an empty session table.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Gets a session by id.
    #[must_use]
    pub fn get(&self, session_id: SessionId) -> Option<&Session> {
        self.sessions.get(&session_id)
    }

    /// Number of sessions ever opened.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session was ever opened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Opens a Pending session for a freshly matched request.
    ///
    /// Called by the matching pass only.
    pub fn open(
        &mut self,
        request_id: RequestId,
        rider: Address,
        driver: Address,
        now: Timestamp,
    ) -> SessionId {
        let session_id = self.next_id;
        self.next_id += 1;
        self.sessions.insert(
            session_id,
            Session::new(session_id, request_id, rider, driver, now),
        );
        info!(
            session_id,
            request_id,
            driver = %short_hex(&driver),
            "Session opened"
        );
        session_id
    }

    // =========================================================================
    // REVEALS
    // =========================================================================

    /// Opens the pickup commitment.
    ///
    /// # Errors
    /// `SessionNotFound`, `InvalidStateTransition`, `Unauthorized`,
    /// `InvalidCoordinate`, `InvalidReveal`.
    #[allow(clippy::too_many_arguments)]
    pub fn reveal_pickup(
        &mut self,
        session_id: SessionId,
        caller: Address,
        coord: &[u8],
        salt: &[u8],
        requests: &RequestRegistry,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        self.reveal(
            LocationKind::Pickup,
            session_id,
            caller,
            coord,
            salt,
            requests,
            now,
            events,
        )
    }

    /// Opens the dropoff commitment.
    ///
    /// # Errors
    /// Same as [`Self::reveal_pickup`].
    #[allow(clippy::too_many_arguments)]
    pub fn reveal_dropoff(
        &mut self,
        session_id: SessionId,
        caller: Address,
        coord: &[u8],
        salt: &[u8],
        requests: &RequestRegistry,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        self.reveal(
            LocationKind::Dropoff,
            session_id,
            caller,
            coord,
            salt,
            requests,
            now,
            events,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn reveal(
        &mut self,
        kind: LocationKind,
        session_id: SessionId,
        caller: Address,
        coord: &[u8],
        salt: &[u8],
        requests: &RequestRegistry,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let max_coord_bytes = self.config.max_coord_bytes;
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;

        if session.status.is_terminal() {
            return Err(SessionError::InvalidStateTransition {
                session_id,
                from: session.status,
                action: "reveal",
            });
        }
        if caller != session.rider {
            return Err(SessionError::Unauthorized(session_id));
        }
        if coord.is_empty() || coord.len() > max_coord_bytes {
            return Err(SessionError::InvalidCoordinate {
                actual: coord.len(),
                max: max_coord_bytes,
            });
        }

        let request = backing_request(requests, session.request_id)?;
        let expected = match kind {
            LocationKind::Pickup => &request.pickup_commit,
            LocationKind::Dropoff => &request.dropoff_commit,
        };
        if !verify_commitment(coord, salt, expected) {
            return Err(SessionError::InvalidReveal(kind));
        }

        let slot = match kind {
            LocationKind::Pickup => &mut session.pickup_coord,
            LocationKind::Dropoff => &mut session.dropoff_coord,
        };
        if slot.is_some() {
            debug!(session_id, %kind, "Repeated reveal ignored");
            return Ok(());
        }
        *slot = Some(coord.to_vec());
        session.updated_at = now;

        debug!(session_id, %kind, "Location revealed");
        events.emit(RideEvent::LocationRevealed { session_id, kind });

        if session.pickup_revealed() && session.dropoff_revealed() {
            session.status = SessionStatus::Active;
            info!(session_id, "Session activated");
            events.emit(RideEvent::SessionActivated { session_id });
        }
        Ok(())
    }

    // =========================================================================
    // SETTLEMENT
    // =========================================================================

    /// Cancels a Pending or Active session and splits the deposit.
    ///
    /// # Errors
    /// `SessionNotFound`, `InvalidStateTransition`, `Unauthorized`, `Escrow`.
    pub fn cancel(
        &mut self,
        session_id: SessionId,
        caller: Address,
        requests: &RequestRegistry,
        escrow: &mut dyn EscrowLedger,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let policy = self.config.cancel_policy;
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;

        let rider_bps = match session.status {
            SessionStatus::Pending => policy.pending_rider_bps,
            SessionStatus::Active => policy.active_rider_bps,
            from => {
                return Err(SessionError::InvalidStateTransition {
                    session_id,
                    from,
                    action: "cancel",
                })
            }
        };
        if !session.is_participant(&caller) {
            return Err(SessionError::Unauthorized(session_id));
        }

        let deposit = backing_request(requests, session.request_id)?.deposit;
        let (rider_share, driver_share) = CancelPolicy::split(deposit, rider_bps);
        escrow.release(&[(session.rider, rider_share), (session.driver, driver_share)])?;

        session.status = SessionStatus::Cancelled;
        session.updated_at = now;
        session.closed_by = Some(caller);

        info!(
            session_id,
            by = %short_hex(&caller),
            %rider_share,
            %driver_share,
            "Session cancelled"
        );
        events.emit(RideEvent::SessionCancelled {
            session_id,
            by: caller,
        });
        Ok(())
    }

    /// Completes an Active session and pays the deposit to the driver.
    ///
    /// # Errors
    /// `SessionNotFound`, `InvalidStateTransition`, `Unauthorized`, `Escrow`.
    pub fn complete(
        &mut self,
        session_id: SessionId,
        caller: Address,
        requests: &RequestRegistry,
        escrow: &mut dyn EscrowLedger,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;

        if session.status != SessionStatus::Active {
            return Err(SessionError::InvalidStateTransition {
                session_id,
                from: session.status,
                action: "complete",
            });
        }
        if !session.is_participant(&caller) {
            return Err(SessionError::Unauthorized(session_id));
        }

        let deposit = backing_request(requests, session.request_id)?.deposit;
        escrow.release(&[(session.driver, deposit)])?;

        session.status = SessionStatus::Completed;
        session.updated_at = now;
        session.closed_by = Some(caller);

        info!(session_id, %deposit, "Session completed");
        events.emit(RideEvent::SessionCompleted { session_id });
        Ok(())
    }

    // =========================================================================
    // ENCRYPTED COORDINATION
    // =========================================================================

    /// Accepts a structurally valid envelope from a participant of an
    /// Active session and returns its hash.
    ///
    /// # Errors
    /// `SessionNotFound`, `InvalidStateTransition`, `Unauthorized`,
    /// `Envelope`, `AdHashMismatch`.
    pub fn post_message(
        &mut self,
        session_id: SessionId,
        sender: Address,
        header: &[u8],
        ciphertext: &[u8],
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<Hash, SessionError> {
        let config = &self.config;
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;

        if session.status != SessionStatus::Active {
            return Err(SessionError::InvalidStateTransition {
                session_id,
                from: session.status,
                action: "post message to",
            });
        }
        let recipient = session
            .counterparty(&sender)
            .ok_or(SessionError::Unauthorized(session_id))?;

        let envelope = validate_envelope(header, ciphertext, config.envelope_limits)?;
        if config.require_ad_binding
            && envelope.ad_hash
                != associated_data_hash(config.chain_id, session_id, &sender, &recipient)
        {
            return Err(SessionError::AdHashMismatch(session_id));
        }

        session.message_count += 1;
        session.last_envelope_hash = Some(envelope.envelope_hash);
        session.updated_at = now;

        debug!(
            session_id,
            n = envelope.n,
            message_count = session.message_count,
            "Encrypted message accepted"
        );
        events.emit(RideEvent::EncryptedMessage {
            session_id,
            envelope_hash: envelope.envelope_hash,
        });
        Ok(envelope.envelope_hash)
    }
}

fn backing_request(
    requests: &RequestRegistry,
    request_id: RequestId,
) -> Result<&PendingRequest, SessionError> {
    requests
        .get(request_id)
        .ok_or(SessionError::RequestNotFound(request_id))
}
