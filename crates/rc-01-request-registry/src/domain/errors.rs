//! Request Registry error types.

use super::entities::{RequestId, U256};
use shared_types::EscrowError;
use thiserror::Error;

/// All errors the Request Registry can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A 32-byte field has the wrong length.
    #[error("invalid commitment length for {field}: expected 32, got {actual}")]
    InvalidCommitmentLength {
        /// Offending field.
        field: &'static str,
        /// Submitted length.
        actual: usize,
    },

    /// The rider is the zero address.
    #[error("invalid rider address")]
    InvalidAddress,

    /// ttl is zero or above the configured maximum.
    #[error("invalid ttl {ttl}: must be within 1..={max}")]
    InvalidTtl {
        /// Requested ttl.
        ttl: u64,
        /// Configured maximum.
        max: u64,
    },

    /// Deposit below the minimum, or the escrow could not lock it.
    #[error("insufficient deposit {deposit}: {reason}")]
    InsufficientDeposit {
        /// Offered deposit.
        deposit: U256,
        /// Why the deposit was refused.
        reason: String,
    },

    /// Unknown request id.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// The request is no longer open.
    #[error("request {0} is not open")]
    RequestNotOpen(RequestId),

    /// Refund from escrow failed.
    #[error("escrow error: {0}")]
    Escrow(#[from] EscrowError),
}
