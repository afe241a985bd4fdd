//! # Operation Dispatcher
//!
//! One closed enum of ledger operations and one function that routes each
//! variant to the component that owns it.
//!
//! | Operation | Component | Clock |
//! |-----------|-----------|-------|
//! | `CreateRequest`, `ExpireRequest` | RequestRegistry | height |
//! | `SubmitDriverCommit` | CommitStore | height |
//! | `RevealPickup`, `RevealDropoff`, `Cancel`, `Complete`, `PostMessage` | SessionManager | height |
//! | `PublishKeys` | KeyDirectory | timestamp |
//! | `PrecompileCall` | precompile at `address` | both |
//!
//! Every component validates before mutating, so a failed operation leaves
//! the ledger and the event sink untouched.

use crate::precompiles::{execute_precompile, PrecompileContext, PrecompileError};
use crate::state::LedgerState;
use rc_01_request_registry::{CreateRequestParams, RegistryError};
use rc_02_commit_store::CommitError;
use rc_04_session_manager::SessionError;
use rc_06_key_directory::{KeyDirectoryError, PublishKeysParams};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{
    short_hex, Address, BlockContext, EventSink, Hash, RequestId, SessionId, U256,
};
use thiserror::Error;
use tracing::debug;

/// A ledger operation as submitted by `caller`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    /// Open a ride request. The caller is the rider.
    CreateRequest {
        #[serde_as(as = "Hex")]
        cell_topic: Vec<u8>,
        #[serde_as(as = "Hex")]
        region_topic: Vec<u8>,
        #[serde_as(as = "Hex")]
        params_hash: Vec<u8>,
        #[serde_as(as = "Hex")]
        pickup_commit: Vec<u8>,
        #[serde_as(as = "Hex")]
        dropoff_commit: Vec<u8>,
        max_driver_eta: u32,
        ttl: u64,
        deposit: U256,
    },
    /// Commit to accept a request. The caller is the driver.
    SubmitDriverCommit {
        request_id: RequestId,
        #[serde_as(as = "Hex")]
        commitment: Vec<u8>,
        eta: u32,
    },
    /// Open the pickup commitment.
    RevealPickup {
        session_id: SessionId,
        #[serde_as(as = "Hex")]
        coord: Vec<u8>,
        #[serde_as(as = "Hex")]
        salt: Vec<u8>,
    },
    /// Open the dropoff commitment.
    RevealDropoff {
        session_id: SessionId,
        #[serde_as(as = "Hex")]
        coord: Vec<u8>,
        #[serde_as(as = "Hex")]
        salt: Vec<u8>,
    },
    /// Cancel a Pending or Active session.
    Cancel { session_id: SessionId },
    /// Complete an Active session.
    Complete { session_id: SessionId },
    /// Post an encrypted envelope to an Active session.
    PostMessage {
        session_id: SessionId,
        #[serde_as(as = "Hex")]
        header: Vec<u8>,
        #[serde_as(as = "Hex")]
        ciphertext: Vec<u8>,
    },
    /// Publish the caller's key bundle.
    PublishKeys {
        #[serde_as(as = "Hex")]
        identity_dh_key: [u8; 32],
        #[serde_as(as = "Hex")]
        identity_sign_key: [u8; 32],
        #[serde_as(as = "Hex")]
        signed_pre_key: [u8; 32],
        #[serde_as(as = "Hex")]
        signature: Vec<u8>,
        expires_at: u64,
    },
    /// Expire a lapsed request. Anyone may call it.
    ExpireRequest { request_id: RequestId },
    /// Call a precompile with ABI calldata.
    PrecompileCall {
        #[serde_as(as = "Hex")]
        address: Address,
        #[serde_as(as = "Hex")]
        input: Vec<u8>,
        gas_limit: u64,
    },
}

impl Operation {
    /// Variant name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRequest { .. } => "CreateRequest",
            Self::SubmitDriverCommit { .. } => "SubmitDriverCommit",
            Self::RevealPickup { .. } => "RevealPickup",
            Self::RevealDropoff { .. } => "RevealDropoff",
            Self::Cancel { .. } => "Cancel",
            Self::Complete { .. } => "Complete",
            Self::PostMessage { .. } => "PostMessage",
            Self::PublishKeys { .. } => "PublishKeys",
            Self::ExpireRequest { .. } => "ExpireRequest",
            Self::PrecompileCall { .. } => "PrecompileCall",
        }
    }
}

/// What a successful operation produced.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum OperationOutcome {
    /// New request id.
    RequestCreated { request_id: RequestId },
    /// Commit stored or replaced.
    CommitStored,
    /// Reveal accepted; `active` once both halves are open.
    LocationRevealed { session_id: SessionId, active: bool },
    /// Session cancelled.
    SessionCancelled { session_id: SessionId },
    /// Session completed.
    SessionCompleted { session_id: SessionId },
    /// Envelope accepted.
    MessagePosted {
        #[serde_as(as = "Hex")]
        envelope_hash: Hash,
    },
    /// Key bundle replaced.
    KeysPublished,
    /// `expired` is false when there was nothing to expire.
    RequestExpiry { expired: bool },
    /// Precompile return data.
    PrecompileReturned {
        gas_used: u64,
        #[serde_as(as = "Hex")]
        output: Vec<u8>,
    },
}

/// Dispatch failures, wrapping each component's error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Request Registry rejection.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Commit Store rejection.
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Session Manager rejection.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Key Directory rejection.
    #[error(transparent)]
    KeyDirectory(#[from] KeyDirectoryError),

    /// Precompile failure.
    #[error(transparent)]
    Precompile(#[from] PrecompileError),

    /// Nothing is installed at the called address.
    #[error("no precompile at {0}")]
    UnknownPrecompile(String),
}

/// Applies one operation to the ledger.
///
/// # Errors
/// The owning component's rejection. State is unchanged on error.
pub fn dispatch(
    state: &mut LedgerState,
    ctx: &BlockContext,
    caller: Address,
    op: Operation,
    events: &mut dyn EventSink,
) -> Result<OperationOutcome, DispatchError> {
    let now = ctx.height;
    debug!(op = op.name(), caller = %short_hex(&caller), block = %ctx, "Dispatching");

    let outcome = match op {
        Operation::CreateRequest {
            cell_topic,
            region_topic,
            params_hash,
            pickup_commit,
            dropoff_commit,
            max_driver_eta,
            ttl,
            deposit,
        } => {
            let params = CreateRequestParams {
                rider: caller,
                cell_topic,
                region_topic,
                params_hash,
                pickup_commit,
                dropoff_commit,
                max_driver_eta,
                ttl,
                deposit,
            };
            let request_id = state
                .requests
                .create(params, now, &mut state.escrow, events)?;
            OperationOutcome::RequestCreated { request_id }
        }

        Operation::SubmitDriverCommit {
            request_id,
            commitment,
            eta,
        } => {
            state.commits.submit(
                &state.requests,
                request_id,
                caller,
                &commitment,
                eta,
                now,
                events,
            )?;
            OperationOutcome::CommitStored
        }

        Operation::RevealPickup {
            session_id,
            coord,
            salt,
        } => {
            state.sessions.reveal_pickup(
                session_id,
                caller,
                &coord,
                &salt,
                &state.requests,
                now,
                events,
            )?;
            revealed(state, session_id)
        }

        Operation::RevealDropoff {
            session_id,
            coord,
            salt,
        } => {
            state.sessions.reveal_dropoff(
                session_id,
                caller,
                &coord,
                &salt,
                &state.requests,
                now,
                events,
            )?;
            revealed(state, session_id)
        }

        Operation::Cancel { session_id } => {
            state.sessions.cancel(
                session_id,
                caller,
                &state.requests,
                &mut state.escrow,
                now,
                events,
            )?;
            OperationOutcome::SessionCancelled { session_id }
        }

        Operation::Complete { session_id } => {
            state.sessions.complete(
                session_id,
                caller,
                &state.requests,
                &mut state.escrow,
                now,
                events,
            )?;
            OperationOutcome::SessionCompleted { session_id }
        }

        Operation::PostMessage {
            session_id,
            header,
            ciphertext,
        } => {
            let envelope_hash =
                state
                    .sessions
                    .post_message(session_id, caller, &header, &ciphertext, now, events)?;
            OperationOutcome::MessagePosted { envelope_hash }
        }

        Operation::PublishKeys {
            identity_dh_key,
            identity_sign_key,
            signed_pre_key,
            signature,
            expires_at,
        } => {
            let params = PublishKeysParams {
                identity_dh_key,
                identity_sign_key,
                signed_pre_key,
                signature,
                expires_at,
            };
            state.keys.publish(caller, params, ctx.timestamp, events)?;
            OperationOutcome::KeysPublished
        }

        Operation::ExpireRequest { request_id } => {
            let expired = state
                .requests
                .expire(request_id, now, &mut state.escrow, events)?;
            OperationOutcome::RequestExpiry { expired }
        }

        Operation::PrecompileCall {
            address,
            input,
            gas_limit,
        } => {
            let mut pctx = PrecompileContext {
                caller,
                block: *ctx,
                keys: &mut state.keys,
                events,
            };
            let output =
                execute_precompile(&state.precompiles, address, &mut pctx, &input, gas_limit)
                    .ok_or_else(|| {
                        DispatchError::UnknownPrecompile(format!("0x{}", hex::encode(address)))
                    })??;
            OperationOutcome::PrecompileReturned {
                gas_used: output.gas_used,
                output: output.output,
            }
        }
    };

    Ok(outcome)
}

fn revealed(state: &LedgerState, session_id: SessionId) -> OperationOutcome {
    let active = state
        .sessions
        .get(session_id)
        .is_some_and(|s| s.pickup_revealed() && s.dropoff_revealed());
    OperationOutcome::LocationRevealed { session_id, active }
}
