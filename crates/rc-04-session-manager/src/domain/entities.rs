//! Session entities.

pub use shared_types::{Address, Hash, RequestId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use std::fmt;

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Matched, waiting for the rider's reveals.
    #[default]
    Pending,
    /// Both locations revealed; encrypted coordination allowed.
    Active,
    /// Ride finished, deposit paid to the driver.
    Completed,
    /// Cancelled by a participant, deposit split.
    Cancelled,
}

impl SessionStatus {
    /// Completed and Cancelled accept no further operations.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A matched ride.
///
/// INVARIANT: a coordinate is `Some` iff that half was revealed with a valid
/// opening of the request's commitment.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Monotonic identifier.
    pub session_id: SessionId,
    /// The consumed request.
    pub request_id: RequestId,
    /// Rider of the request.
    #[serde_as(as = "Hex")]
    pub rider: Address,
    /// Winning driver.
    #[serde_as(as = "Hex")]
    pub driver: Address,
    /// Revealed pickup coordinate.
    #[serde_as(as = "Option<Hex>")]
    pub pickup_coord: Option<Vec<u8>>,
    /// Revealed dropoff coordinate.
    #[serde_as(as = "Option<Hex>")]
    pub dropoff_coord: Option<Vec<u8>>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Round the session was opened in.
    pub created_at: Timestamp,
    /// Round of the last state change.
    pub updated_at: Timestamp,
    /// Envelopes accepted so far.
    pub message_count: u64,
    /// Hash of the most recent envelope.
    #[serde_as(as = "Option<Hex>")]
    pub last_envelope_hash: Option<Hash>,
    /// Participant that completed or cancelled the session.
    #[serde_as(as = "Option<Hex>")]
    pub closed_by: Option<Address>,
}

impl Session {
    /// Creates a Pending session with nothing revealed.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        request_id: RequestId,
        rider: Address,
        driver: Address,
        now: Timestamp,
    ) -> Self {
        Self {
            session_id,
            request_id,
            rider,
            driver,
            pickup_coord: None,
            dropoff_coord: None,
            status: SessionStatus::Pending,
            created_at: now,
            updated_at: now,
            message_count: 0,
            last_envelope_hash: None,
            closed_by: None,
        }
    }

    /// Returns true once the rider has opened the pickup commitment.
    #[must_use]
    pub fn pickup_revealed(&self) -> bool {
        self.pickup_coord.is_some()
    }

    /// Returns true once the rider has opened the dropoff commitment.
    #[must_use]
    pub fn dropoff_revealed(&self) -> bool {
        self.dropoff_coord.is_some()
    }

    /// Returns true if `who` is the rider or the driver.
    #[must_use]
    pub fn is_participant(&self, who: &Address) -> bool {
        *who == self.rider || *who == self.driver
    }

    /// The other participant, if `who` is one.
    #[must_use]
    pub fn counterparty(&self, who: &Address) -> Option<Address> {
        if *who == self.rider {
            Some(self.driver)
        } else if *who == self.driver {
            Some(self.rider)
        } else {
            None
        }
    }
}
