//! # Discovery Events
//!
//! Advisory events emitted by the components for off-ledger subscribers
//! (drivers watching a cell topic, clients watching their session).
//!
//! Events are never read back as authoritative state. The tables owned by
//! each component are the only source of truth.

use crate::entities::{Address, Hash, RequestId, SessionId, Topic};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// Which half of a ride a reveal opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationKind {
    /// Pickup coordinate.
    Pickup,
    /// Dropoff coordinate.
    Dropoff,
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Dropoff => write!(f, "dropoff"),
        }
    }
}

/// Events emitted during a round, in emission order.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RideEvent {
    /// A rider opened a request on a discovery topic.
    RideRequested {
        /// Cell-level discovery topic.
        #[serde_as(as = "Hex")]
        cell_topic: Topic,
        /// Region-level discovery topic.
        #[serde_as(as = "Hex")]
        region_topic: Topic,
        /// The new request.
        request_id: RequestId,
    },
    /// A driver committed to accept a request.
    DriverAcceptCommitted {
        /// The request committed to.
        request_id: RequestId,
        /// The committing driver.
        #[serde_as(as = "Hex")]
        driver: Address,
    },
    /// The matching pass paired a request with a driver.
    Matched {
        /// The new session.
        session_id: SessionId,
        /// The consumed request.
        request_id: RequestId,
        /// Rider of the request.
        #[serde_as(as = "Hex")]
        rider: Address,
        /// Winning driver.
        #[serde_as(as = "Hex")]
        driver: Address,
    },
    /// A request lapsed without a match and its deposit was refunded.
    RequestExpired {
        /// The expired request.
        request_id: RequestId,
    },
    /// The rider opened one location commitment.
    LocationRevealed {
        /// The session.
        session_id: SessionId,
        /// Which commitment was opened.
        kind: LocationKind,
    },
    /// Both locations are revealed; encrypted coordination may start.
    SessionActivated {
        /// The session.
        session_id: SessionId,
    },
    /// A participant cancelled the session.
    SessionCancelled {
        /// The session.
        session_id: SessionId,
        /// Who cancelled.
        #[serde_as(as = "Hex")]
        by: Address,
    },
    /// The ride finished and the deposit was released to the driver.
    SessionCompleted {
        /// The session.
        session_id: SessionId,
    },
    /// A structurally valid encrypted message was posted.
    EncryptedMessage {
        /// The session.
        session_id: SessionId,
        /// `keccak256(header ‖ ciphertext)`.
        #[serde_as(as = "Hex")]
        envelope_hash: Hash,
    },
    /// An identity replaced its key bundle.
    KeysPublished {
        /// Bundle owner.
        #[serde_as(as = "Hex")]
        owner: Address,
    },
}

/// Outbound port for advisory events.
pub trait EventSink {
    /// Records an event.
    fn emit(&mut self, event: RideEvent);
}

impl EventSink for Vec<RideEvent> {
    fn emit(&mut self, event: RideEvent) {
        self.push(event);
    }
}

/// Sink that drops every event. Useful when replaying for state only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&mut self, _event: RideEvent) {}
}
