//! # Envelope Validator (Component 5)
//!
//! Structural validation of encrypted ratchet envelopes. The ledger never
//! decrypts anything; it only checks that a posted `(header, ciphertext)`
//! pair is well formed and commits to its hash.
//!
//! ## Header Layout (73 bytes)
//!
//! | Offset | Size | Field | Encoding |
//! |--------|------|-------|----------|
//! | 0 | 1 | `version` | must be 1 |
//! | 1 | 32 | `dh_pub` | ratchet public key |
//! | 33 | 4 | `pn` | big-endian u32 |
//! | 37 | 4 | `n` | big-endian u32 |
//! | 41 | 32 | `ad_hash` | associated-data hash |
//!
//! ## Check Order
//!
//! 1. header length is exactly 73
//! 2. header within `max_header_bytes` (skipped when 0)
//! 3. ciphertext not empty
//! 4. ciphertext within `max_ciphertext_bytes` (skipped when 0)
//! 5. version byte is 1

pub mod errors;
pub mod header;
pub mod validator;

pub use errors::EnvelopeError;
pub use header::{associated_data_hash, EnvelopeHeader, ENVELOPE_VERSION, HEADER_LEN};
pub use validator::{envelope_hash, validate_envelope, EnvelopeLimits, ValidatedEnvelope};
