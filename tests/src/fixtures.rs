//! Shared test fixtures.

use primitive_types::U256;
use ride_node::{NodeConfig, Operation, RoundExecutor, Transaction, LedgerState};
use shared_types::{commitment, Address};

/// Rider account.
pub const RIDER: Address = [0xAA; 20];
/// First driver.
pub const DRIVER_A: Address = [0xB1; 20];
/// Second driver.
pub const DRIVER_B: Address = [0xB2; 20];
/// Third driver.
pub const DRIVER_C: Address = [0xB3; 20];
/// Account with no role in any session.
pub const STRANGER: Address = [0xEE; 20];

/// Pickup coordinate and salt used by [`create_request`].
pub const PICKUP: (&[u8], &[u8]) = (b"40.7128,-74.0060", b"salt-pickup");
/// Dropoff coordinate and salt used by [`create_request`].
pub const DROPOFF: (&[u8], &[u8]) = (b"40.7580,-73.9855", b"salt-dropoff");

/// Starting balance of the rider.
pub const RIDER_FUNDS: u64 = 10_000;
/// Deposit of every request built by [`create_request`].
pub const DEPOSIT: u64 = 1_000;

/// Config with a one-round commit window.
#[must_use]
pub fn config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.matching.commit_window = 1;
    config
}

/// Executor with the rider funded.
#[must_use]
pub fn funded_executor(config: &NodeConfig) -> RoundExecutor {
    let state = LedgerState::new(config)
        .with_allocations([(RIDER, U256::from(RIDER_FUNDS))])
        .expect("genesis allocation");
    RoundExecutor::with_state(config, state)
}

/// `CreateRequest` from the rider committing to [`PICKUP`] and [`DROPOFF`].
#[must_use]
pub fn create_request(ttl: u64, max_driver_eta: u32) -> Transaction {
    Transaction {
        caller: RIDER,
        op: Operation::CreateRequest {
            cell_topic: vec![0xC0; 32],
            region_topic: vec![0xD0; 32],
            params_hash: vec![0x50; 32],
            pickup_commit: commitment(PICKUP.0, PICKUP.1).to_vec(),
            dropoff_commit: commitment(DROPOFF.0, DROPOFF.1).to_vec(),
            max_driver_eta,
            ttl,
            deposit: U256::from(DEPOSIT),
        },
    }
}

/// Driver commit with a commitment derived from the driver address.
#[must_use]
pub fn driver_commit(driver: Address, request_id: u64, eta: u32) -> Transaction {
    let mut commitment = [0u8; 32];
    commitment[..20].copy_from_slice(&driver);
    Transaction {
        caller: driver,
        op: Operation::SubmitDriverCommit {
            request_id,
            commitment: commitment.to_vec(),
            eta,
        },
    }
}

/// Rider reveals both locations of `session_id`.
#[must_use]
pub fn reveal_both(session_id: u64) -> Vec<Transaction> {
    vec![
        Transaction {
            caller: RIDER,
            op: Operation::RevealPickup {
                session_id,
                coord: PICKUP.0.to_vec(),
                salt: PICKUP.1.to_vec(),
            },
        },
        Transaction {
            caller: RIDER,
            op: Operation::RevealDropoff {
                session_id,
                coord: DROPOFF.0.to_vec(),
                salt: DROPOFF.1.to_vec(),
            },
        },
    ]
}

/// Wraps an operation from `caller`.
#[must_use]
pub fn tx(caller: Address, op: Operation) -> Transaction {
    Transaction { caller, op }
}
