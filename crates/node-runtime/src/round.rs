//! # Round Executor
//!
//! Drives one round of the ledger:
//!
//! 1. reject a block height that does not advance
//! 2. apply every transaction in order, recording each result
//! 3. run the matching pass once
//! 4. hash the tables into the post-round state root
//!
//! A failing transaction is recorded and skipped; it never aborts the round.

use crate::container::NodeConfig;
use crate::dispatcher::{dispatch, Operation, OperationOutcome};
use crate::state::{LedgerState, StateError};
use rc_03_matching_engine::{MatchingEngine, RoundOutcome};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, BlockContext, Hash, RideEvent};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A signed-off operation: `caller` has already been authenticated by the
/// host ledger.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Authenticated sender.
    #[serde_as(as = "Hex")]
    pub caller: Address,
    /// The operation.
    pub op: Operation,
}

/// Result of one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxResult {
    /// Applied.
    Applied {
        /// What it produced.
        outcome: OperationOutcome,
    },
    /// Rejected; state unchanged.
    Rejected {
        /// Component error message.
        error: String,
    },
}

impl TxResult {
    /// Returns true if the transaction was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Everything a round produced.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReceipt {
    /// Round clock.
    pub block: BlockContext,
    /// One entry per transaction, in order.
    pub results: Vec<TxResult>,
    /// Matching pass outcome.
    pub matching: RoundOutcome,
    /// Events in emission order (transactions first, then matching).
    pub events: Vec<RideEvent>,
    /// Post-round state root.
    #[serde_as(as = "Hex")]
    pub state_root: Hash,
}

/// Round errors. Nothing is applied when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Height did not advance.
    #[error("non-monotonic height: {height} after {last}")]
    NonMonotonicHeight {
        /// Rejected height.
        height: u64,
        /// Last executed height.
        last: u64,
    },

    /// State root could not be computed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Owns the ledger state and executes rounds against it.
pub struct RoundExecutor {
    state: LedgerState,
    engine: MatchingEngine,
    last_height: Option<u64>,
}

impl RoundExecutor {
    /// Creates an executor over fresh tables.
    #[must_use]
    pub fn new(config: &NodeConfig) -> Self {
        Self::with_state(config, LedgerState::new(config))
    }

    /// Creates an executor over existing tables (e.g. with genesis balances).
    #[must_use]
    pub fn with_state(config: &NodeConfig, state: LedgerState) -> Self {
        Self {
            state,
            engine: MatchingEngine::new(config.matching.clone()),
            last_height: None,
        }
    }

    /// Read access to the tables.
    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Height of the last executed round.
    #[must_use]
    pub fn last_height(&self) -> Option<u64> {
        self.last_height
    }

    /// Executes one round.
    ///
    /// # Errors
    /// `NonMonotonicHeight` if `ctx.height` does not exceed the last round's.
    #[instrument(skip(self, transactions), fields(height = ctx.height, txs = transactions.len()))]
    pub fn execute_round(
        &mut self,
        ctx: BlockContext,
        transactions: Vec<Transaction>,
    ) -> Result<RoundReceipt, RoundError> {
        if let Some(last) = self.last_height {
            if ctx.height <= last {
                return Err(RoundError::NonMonotonicHeight {
                    height: ctx.height,
                    last,
                });
            }
        }

        let mut events: Vec<RideEvent> = Vec::new();
        let mut results = Vec::with_capacity(transactions.len());

        for (index, tx) in transactions.into_iter().enumerate() {
            let op_name = tx.op.name();
            match dispatch(&mut self.state, &ctx, tx.caller, tx.op, &mut events) {
                Ok(outcome) => results.push(TxResult::Applied { outcome }),
                Err(e) => {
                    warn!(index, op = op_name, error = %e, "Transaction rejected");
                    results.push(TxResult::Rejected {
                        error: e.to_string(),
                    });
                }
            }
        }

        let state = &mut self.state;
        let matching = self.engine.run_round(
            ctx.height,
            &mut state.requests,
            &state.commits,
            &mut state.sessions,
            &mut state.escrow,
            &mut events,
        );

        let state_root = self.state.state_root()?;
        self.last_height = Some(ctx.height);

        info!(
            applied = results.iter().filter(|r| r.is_applied()).count(),
            events = events.len(),
            state_root = %hex::encode(state_root),
            "Round executed"
        );

        Ok(RoundReceipt {
            block: ctx,
            results,
            matching,
            events,
            state_root,
        })
    }
}
