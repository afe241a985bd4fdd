//! # Request Registry (Component 1)
//!
//! Admits ride requests that carry only hiding commitments to the pickup and
//! dropoff locations, escrows the rider's deposit and tracks each request's
//! lifecycle flag.
//!
//! ## Lifecycle
//!
//! | From | To | Trigger |
//! |------|----|---------|
//! | - | Open | `create()` |
//! | Open | Matched | matching pass selects a driver |
//! | Open | Expired | `expire()` once `now >= expires_at` |
//!
//! Records are append-only; nothing is ever deleted from the table.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = RequestRegistry::with_defaults();
//! let id = registry.create(params, ctx.height, &mut escrow, &mut events)?;
//! ```

pub mod domain;

pub use domain::*;
