//! # Shared Types Crate
//!
//! Primitives and ports shared by every ride-chain component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate identifiers and events live here.
//! - **Deterministic by construction**: no wall clock, no randomness; the only
//!   clock is the round's `BlockContext`.
//! - **Ports, not globals**: escrow and event emission are traits passed in
//!   explicitly by the caller.

pub mod crypto;
pub mod entities;
pub mod escrow;
pub mod events;

pub use crypto::*;
pub use entities::*;
pub use escrow::{EscrowError, EscrowLedger, InMemoryEscrow};
pub use events::{EventSink, LocationKind, NullEventSink, RideEvent};
