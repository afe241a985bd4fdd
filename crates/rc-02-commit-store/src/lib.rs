//! # Driver Commit Store (Component 2)
//!
//! Holds drivers' sealed acceptances of open ride requests. A commit binds a
//! driver to an ETA and an opaque 32-byte commitment; the matching pass later
//! ranks commits by ETA.
//!
//! ## Rules
//!
//! - Keyed by `(request_id, driver)`; a driver re-submitting overwrites its
//!   earlier commit (last write wins)
//! - Only Open, unexpired requests accept commits
//! - A rider cannot commit to its own request

pub mod domain;

pub use domain::*;
