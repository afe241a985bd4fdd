//! Commit Store error types.

use super::entities::RequestId;
use thiserror::Error;

/// All errors the Commit Store can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// Commitment is not exactly 32 bytes.
    #[error("invalid driver commit: expected 32 bytes, got {actual}")]
    InvalidDriverCommit {
        /// Submitted length.
        actual: usize,
    },

    /// Driver is the zero address.
    #[error("invalid driver address")]
    InvalidAddress,

    /// Unknown request id.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// The request's ttl has elapsed.
    #[error("request {0} has expired")]
    RequestExpired(RequestId),

    /// The request was already matched or expired.
    #[error("request {0} is not open")]
    RequestNotOpen(RequestId),

    /// The rider tried to commit to its own request.
    #[error("rider cannot commit to own request {0}")]
    SelfCommit(RequestId),
}
