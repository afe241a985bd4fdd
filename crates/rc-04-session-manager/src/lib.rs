//! # Session Manager (Component 4)
//!
//! Owns the lifecycle of a matched ride.
//!
//! ## State Machine
//!
//! ```text
//! [Pending] ──both reveals──→ [Active] ──complete──→ [Completed]
//!     │                          │
//!     └────────cancel────────────┴──────────────────→ [Cancelled]
//! ```
//!
//! | Operation | Allowed from | Caller |
//! |-----------|--------------|--------|
//! | `reveal_pickup` / `reveal_dropoff` | Pending, Active | rider |
//! | `post_message` | Active | rider or driver |
//! | `complete` | Active | rider or driver |
//! | `cancel` | Pending, Active | rider or driver |
//!
//! Completed and Cancelled are terminal.

pub mod domain;

pub use domain::*;
