//! # Escrow Port
//!
//! Account balances and fee metering belong to the host ledger. The core only
//! needs to lock a rider's deposit when a request is created and to pay it
//! out again (refund, cancellation split, completion).
//!
//! `InMemoryEscrow` is the adapter used by the node runtime and the tests.

use crate::entities::{short_hex, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors from the host ledger's escrow account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// Owner cannot cover the amount to lock.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount requested.
        required: U256,
        /// Spendable balance of the owner.
        available: U256,
    },

    /// The escrow account holds less than the payout.
    #[error("escrow underflow: payout {payout}, escrowed {escrowed}")]
    EscrowUnderflow {
        /// Total payout requested.
        payout: U256,
        /// Amount currently escrowed.
        escrowed: U256,
    },

    /// Balance arithmetic overflowed.
    #[error("balance overflow")]
    Overflow,
}

/// Outbound port to the host ledger's escrow account.
pub trait EscrowLedger {
    /// Moves `amount` from `owner` into escrow.
    ///
    /// # Errors
    /// `InsufficientFunds` if the owner cannot cover the amount.
    fn lock(&mut self, owner: &Address, amount: U256) -> Result<(), EscrowError>;

    /// Pays every `(recipient, amount)` out of escrow, all or nothing.
    ///
    /// # Errors
    /// `EscrowUnderflow` if the escrow holds less than the total payout.
    fn release(&mut self, payouts: &[(Address, U256)]) -> Result<(), EscrowError>;
}

/// Balance table plus a single pooled escrow account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryEscrow {
    balances: BTreeMap<Address, U256>,
    escrowed: U256,
}

impl InMemoryEscrow {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits an account (genesis allocation, faucet, tests).
    ///
    /// # Errors
    /// `Overflow` if the balance would exceed `U256::MAX`.
    pub fn credit(&mut self, owner: Address, amount: U256) -> Result<(), EscrowError> {
        let balance = self.balances.entry(owner).or_default();
        *balance = balance.checked_add(amount).ok_or(EscrowError::Overflow)?;
        Ok(())
    }

    /// Spendable balance of an account.
    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    /// Total value currently held in escrow.
    #[must_use]
    pub fn escrowed(&self) -> U256 {
        self.escrowed
    }
}

impl EscrowLedger for InMemoryEscrow {
    fn lock(&mut self, owner: &Address, amount: U256) -> Result<(), EscrowError> {
        let available = self.balance_of(owner);
        if available < amount {
            return Err(EscrowError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        let escrowed = self
            .escrowed
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;

        self.balances.insert(*owner, available - amount);
        self.escrowed = escrowed;
        debug!(owner = %short_hex(owner), %amount, "Locked deposit in escrow");
        Ok(())
    }

    fn release(&mut self, payouts: &[(Address, U256)]) -> Result<(), EscrowError> {
        let mut total = U256::zero();
        for (_, amount) in payouts {
            total = total.checked_add(*amount).ok_or(EscrowError::Overflow)?;
        }
        if total > self.escrowed {
            return Err(EscrowError::EscrowUnderflow {
                payout: total,
                escrowed: self.escrowed,
            });
        }

        // Validate every credit before touching balances.
        let mut credited: BTreeMap<Address, U256> = BTreeMap::new();
        for (recipient, amount) in payouts {
            let balance = credited
                .get(recipient)
                .copied()
                .unwrap_or_else(|| self.balance_of(recipient));
            let updated = balance.checked_add(*amount).ok_or(EscrowError::Overflow)?;
            credited.insert(*recipient, updated);
        }

        for (recipient, balance) in credited {
            self.balances.insert(recipient, balance);
        }
        self.escrowed -= total;
        debug!(payouts = payouts.len(), %total, "Released escrow");
        Ok(())
    }
}
