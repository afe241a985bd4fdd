//! Cross-component integration tests.

pub mod envelopes;
pub mod expiry;
pub mod scenario;
