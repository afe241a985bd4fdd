//! Key Directory error types.

use thiserror::Error;

/// Rejections from `publish`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDirectoryError {
    /// Owner is the zero address.
    #[error("invalid owner address")]
    InvalidAddress,

    /// A key field is all zeroes.
    #[error("empty key: {field}")]
    EmptyKey {
        /// Offending field.
        field: &'static str,
    },

    /// Signature is empty or longer than 96 bytes.
    #[error("invalid signature length {actual}: must be within 1..=96")]
    InvalidSignatureLength {
        /// Submitted length.
        actual: usize,
    },

    /// Non-zero expiry that is not in the future.
    #[error("invalid expiry {expires_at}: not after {now}")]
    InvalidExpiry {
        /// Submitted expiry.
        expires_at: u64,
        /// Current block timestamp.
        now: u64,
    },
}
