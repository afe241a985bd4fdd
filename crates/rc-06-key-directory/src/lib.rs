//! # Key Directory (Component 6)
//!
//! One active key bundle per identity, used by clients to run an X3DH-style
//! key agreement before encrypted coordination starts.
//!
//! The directory stores what it is given. It never verifies the signature
//! over the signed pre-key; clients do that against `identity_sign_key`.

pub mod domain;

pub use domain::*;
