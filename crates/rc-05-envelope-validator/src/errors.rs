//! Envelope Validator error types.

use thiserror::Error;

/// Structural rejection reasons, reported in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Header is not exactly 73 bytes.
    #[error("invalid header length: expected 73, got {actual}")]
    InvalidHeaderLength {
        /// Submitted length.
        actual: usize,
    },

    /// Header exceeds the configured maximum.
    #[error("header too large: {actual} > {max}")]
    HeaderTooLarge {
        /// Submitted length.
        actual: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Ciphertext is empty.
    #[error("empty ciphertext")]
    EmptyCiphertext,

    /// Ciphertext exceeds the configured maximum.
    #[error("ciphertext too large: {actual} > {max}")]
    CiphertextTooLarge {
        /// Submitted length.
        actual: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Version byte is not 1.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),
}
