//! Session Manager error types.

use super::entities::{RequestId, SessionId, SessionStatus};
use rc_05_envelope_validator::EnvelopeError;
use shared_types::{EscrowError, LocationKind};
use thiserror::Error;

/// All errors the Session Manager can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Unknown session id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The backing request is missing. Indicates corrupted tables.
    #[error("request {0} backing the session not found")]
    RequestNotFound(RequestId),

    /// The operation is not allowed from the session's current state.
    #[error("cannot {action} session {session_id} in state {from}")]
    InvalidStateTransition {
        /// The session.
        session_id: SessionId,
        /// Current state.
        from: SessionStatus,
        /// Attempted operation.
        action: &'static str,
    },

    /// Caller is not allowed to perform the operation.
    #[error("caller is not authorized for session {0}")]
    Unauthorized(SessionId),

    /// Revealed coordinate is empty or too long.
    #[error("invalid coordinate length {actual}: must be within 1..={max}")]
    InvalidCoordinate {
        /// Submitted length.
        actual: usize,
        /// Configured maximum.
        max: usize,
    },

    /// `(coord, salt)` does not open the committed hash.
    #[error("{0} reveal does not match commitment")]
    InvalidReveal(LocationKind),

    /// Structurally invalid envelope.
    #[error("invalid envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Header's `ad_hash` is not bound to this session and direction.
    #[error("associated data hash mismatch for session {0}")]
    AdHashMismatch(SessionId),

    /// Settlement failed in the escrow.
    #[error("escrow error: {0}")]
    Escrow(#[from] EscrowError),
}
