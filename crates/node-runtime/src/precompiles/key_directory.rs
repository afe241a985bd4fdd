//! # Key Directory Precompile (default `0x…0a02`)
//!
//! | Function | Returns |
//! |----------|---------|
//! | `publishKeys(bytes32,bytes32,bytes32,bytes,uint64)` | `(bool)` |
//! | `getKeys(address)` | `(bytes32,bytes32,bytes32,bytes,uint64,uint64)` |
//!
//! `publishKeys` always publishes for the caller. The expiry is compared
//! against the block timestamp.

use super::interface::{getKeysCall, publishKeysCall, word};
use super::{
    charge_gas, selector_of, Precompile, PrecompileContext, PrecompileError, PrecompileOutput,
};
use alloy_core::primitives::Bytes;
use alloy_core::sol_types::{SolCall, SolValue};
use rc_06_key_directory::PublishKeysParams;
use shared_types::Address;

/// Base gas for a publish (table write).
const PUBLISH_BASE_COST: u64 = 20_000;
/// Base gas for a lookup (table read).
const GET_BASE_COST: u64 = 2_600;
/// Gas per word of calldata.
const KEYS_WORD_COST: u64 = 16;

/// Key directory precompile.
pub struct KeyDirectoryPrecompile {
    address: Address,
}

impl KeyDirectoryPrecompile {
    /// Creates the precompile at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    fn publish(ctx: &mut PrecompileContext<'_>, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
        let call = publishKeysCall::abi_decode(input)
            .map_err(|e| PrecompileError::InvalidInput(e.to_string()))?;
        let params = PublishKeysParams {
            identity_dh_key: call.identityDhKey.0,
            identity_sign_key: call.identitySignKey.0,
            signed_pre_key: call.signedPreKey.0,
            signature: call.signature.to_vec(),
            expires_at: call.expiresAt,
        };
        ctx.keys
            .publish(ctx.caller, params, ctx.block.timestamp, &mut *ctx.events)
            .map_err(|e| PrecompileError::Reverted(e.to_string()))?;
        Ok((true,).abi_encode_params())
    }

    fn get(ctx: &PrecompileContext<'_>, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
        let call = getKeysCall::abi_decode(input)
            .map_err(|e| PrecompileError::InvalidInput(e.to_string()))?;
        let bundle = ctx.keys.get(&call.owner.0 .0);
        Ok((
            word(bundle.identity_dh_key),
            word(bundle.identity_sign_key),
            word(bundle.signed_pre_key),
            Bytes::from(bundle.signature),
            bundle.expires_at,
            bundle.updated_at,
        )
            .abi_encode_params())
    }
}

impl Precompile for KeyDirectoryPrecompile {
    fn execute(
        &self,
        ctx: &mut PrecompileContext<'_>,
        input: &[u8],
        gas_limit: u64,
    ) -> Result<PrecompileOutput, PrecompileError> {
        let sel = selector_of(input)?;

        if sel == publishKeysCall::SELECTOR {
            let gas_used = charge_gas(PUBLISH_BASE_COST, KEYS_WORD_COST, input.len(), gas_limit)?;
            let output = Self::publish(ctx, input)?;
            Ok(PrecompileOutput { gas_used, output })
        } else if sel == getKeysCall::SELECTOR {
            let gas_used = charge_gas(GET_BASE_COST, KEYS_WORD_COST, input.len(), gas_limit)?;
            let output = Self::get(ctx, input)?;
            Ok(PrecompileOutput { gas_used, output })
        } else {
            Err(PrecompileError::UnknownSelector(hex::encode(sel)))
        }
    }

    fn address(&self) -> Address {
        self.address
    }
}
