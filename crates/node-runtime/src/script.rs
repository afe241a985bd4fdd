//! # Round Scripts
//!
//! JSON input format of the `ride-node` binary: genesis balances plus a list
//! of rounds, each a block context and its transactions.
//!
//! ```json
//! {
//!   "allocations": [{ "owner": "aa…aa", "amount": "0x3e8" }],
//!   "rounds": [
//!     { "block": { "height": 1, "timestamp": 1700000000 },
//!       "transactions": [{ "caller": "aa…aa", "op": { "type": "CreateRequest", … } }] }
//!   ]
//! }
//! ```
//!
//! Byte fields are hex without `0x`; amounts are `U256` hex strings.

use crate::container::NodeConfig;
use crate::round::{RoundExecutor, RoundReceipt, Transaction};
use crate::state::LedgerState;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, BlockContext, U256};
use tracing::{info, warn};

/// Genesis balance.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Account.
    #[serde_as(as = "Hex")]
    pub owner: Address,
    /// Starting balance.
    pub amount: U256,
}

/// One round of the script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRound {
    /// Round clock.
    pub block: BlockContext,
    /// Transactions in execution order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A complete replay script.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScript {
    /// Genesis balances.
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    /// Rounds in order.
    pub rounds: Vec<ScriptRound>,
}

impl RoundScript {
    /// Parses a script from JSON.
    ///
    /// # Errors
    /// If the JSON does not match the script format.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Replays every round and returns the receipts.
    ///
    /// A round with a non-advancing height is skipped with a warning.
    ///
    /// # Errors
    /// If genesis allocation or state hashing fails.
    pub fn replay(self, config: &NodeConfig) -> anyhow::Result<Vec<RoundReceipt>> {
        let state = LedgerState::new(config)
            .with_allocations(self.allocations.into_iter().map(|a| (a.owner, a.amount)))?;
        let mut executor = RoundExecutor::with_state(config, state);
        let mut receipts = Vec::with_capacity(self.rounds.len());

        for round in self.rounds {
            match executor.execute_round(round.block, round.transactions) {
                Ok(receipt) => receipts.push(receipt),
                Err(crate::round::RoundError::NonMonotonicHeight { height, last }) => {
                    warn!(height, last, "Skipping round with non-advancing height");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(rounds = receipts.len(), "Replay finished");
        Ok(receipts)
    }
}
