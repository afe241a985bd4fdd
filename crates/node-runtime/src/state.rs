//! # Ledger State
//!
//! Every table owned by the ride components plus the escrow balances, in one
//! value that can be hashed into a state root.
//!
//! ## State Root
//!
//! `keccak256(bincode(requests, commits, sessions, keys, escrow))`. All
//! tables are `BTreeMap`-backed, so the encoding (and therefore the root) is
//! identical on every node that applied the same rounds.

use crate::container::{NodeConfig, PrecompileConfig};
use rc_01_request_registry::RequestRegistry;
use rc_02_commit_store::CommitStore;
use rc_04_session_manager::SessionManager;
use rc_06_key_directory::KeyDirectory;
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, EscrowError, Hash, InMemoryEscrow, U256};
use thiserror::Error;

/// State errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Tables could not be encoded.
    #[error("state encoding failed: {0}")]
    Encoding(String),

    /// Genesis allocation failed.
    #[error("genesis allocation failed: {0}")]
    Genesis(#[from] EscrowError),
}

/// All ride-chain tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Ride requests.
    pub requests: RequestRegistry,
    /// Driver commits.
    pub commits: CommitStore,
    /// Sessions.
    pub sessions: SessionManager,
    /// Key bundles.
    pub keys: KeyDirectory,
    /// Account balances and the escrow pool.
    pub escrow: InMemoryEscrow,
    /// Precompile addresses. Not part of the state root.
    pub precompiles: PrecompileConfig,
}

impl LedgerState {
    /// Creates empty tables configured from `config`.
    #[must_use]
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            requests: RequestRegistry::new(config.registry.clone()),
            commits: CommitStore::new(),
            sessions: SessionManager::new(config.sessions.clone()),
            keys: KeyDirectory::new(),
            escrow: InMemoryEscrow::new(),
            precompiles: config.precompiles.clone(),
        }
    }

    /// Credits genesis balances.
    ///
    /// # Errors
    /// `Genesis` if a balance overflows.
    pub fn with_allocations(
        mut self,
        allocations: impl IntoIterator<Item = (Address, U256)>,
    ) -> Result<Self, StateError> {
        for (owner, amount) in allocations {
            self.escrow.credit(owner, amount)?;
        }
        Ok(self)
    }

    /// Keccak-256 over the canonical encoding of every table.
    ///
    /// # Errors
    /// `Encoding` if serialization fails.
    pub fn state_root(&self) -> Result<Hash, StateError> {
        let encoded = bincode::serialize(&(
            &self.requests,
            &self.commits,
            &self.sessions,
            &self.keys,
            &self.escrow,
        ))
        .map_err(|e| StateError::Encoding(e.to_string()))?;
        Ok(keccak256(&encoded))
    }
}
