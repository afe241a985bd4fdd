//! # Ride-Chain Test Suite
//!
//! Cross-component tests that drive the whole ledger through the round
//! executor, the way a replaying node would.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/round_benchmarks.rs  # Commitment, matching pass, state root
//! └── src/
//!     ├── fixtures.rs        # Actors, funded executors, operation builders
//!     └── integration/
//!         ├── scenario.rs        # Request → match → reveal → message → complete
//!         ├── lifecycle.rs       # Cancellation splits, terminal states, authorization
//!         ├── determinism.rs     # Commit reordering and replay state roots
//!         ├── expiry.rs          # Expiry monotonicity and refunds
//!         ├── envelopes.rs       # Envelope structural invariants
//!         └── key_directory.rs   # Bundle overwrite and precompile access
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rc-tests
//! cargo test -p rc-tests integration::determinism::
//! cargo bench -p rc-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
