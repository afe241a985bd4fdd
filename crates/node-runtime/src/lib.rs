//! # Ride Node Runtime Library
//!
//! Wires the ride-chain components into a deterministic ledger state
//! transition. The main entry point is the `ride-node` binary; this library
//! exposes the pieces for embedding and testing.
//!
//! ## Modules
//!
//! - `container/` - Node configuration and environment overrides
//! - `state` - All tables plus the state root
//! - `dispatcher` - Typed operations routed to their component
//! - `round` - Per-round execution: transactions, then matching
//! - `precompiles/` - ABI entry points for envelope checks and key bundles
//! - `script` - JSON replay format used by the binary
//! - `logging` - `tracing` subscriber setup

pub mod container;
pub mod dispatcher;
pub mod logging;
pub mod precompiles;
pub mod round;
pub mod script;
pub mod state;

pub use container::{ConfigError, NodeConfig};
pub use dispatcher::{dispatch, DispatchError, Operation, OperationOutcome};
pub use round::{RoundError, RoundExecutor, RoundReceipt, Transaction, TxResult};
pub use script::RoundScript;
pub use state::LedgerState;
