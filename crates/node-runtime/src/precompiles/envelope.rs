//! # Envelope Validator Precompile (default `0x…0a01`)
//!
//! `validateEnvelope(bytes header, bytes ciphertext, uint256 maxHeader,
//! uint256 maxCiphertext)` returns
//! `(bool valid, bytes32 envelopeHash, uint8 version, bytes32 dhPub,
//! uint32 pn, uint32 n, bytes32 adHash)`.
//!
//! Stateless. Structural failures revert with the validator's message.

use super::interface::{usize_saturating, validateEnvelopeCall, word};
use super::{
    charge_gas, selector_of, Precompile, PrecompileContext, PrecompileError, PrecompileOutput,
};
use alloy_core::sol_types::{sol_data, SolCall, SolType};

/// Solidity return tuple of `validateEnvelope`.
type EnvelopeReturns = (
    sol_data::Bool,
    sol_data::FixedBytes<32>,
    sol_data::Uint<8>,
    sol_data::FixedBytes<32>,
    sol_data::Uint<32>,
    sol_data::Uint<32>,
    sol_data::FixedBytes<32>,
);
use rc_05_envelope_validator::{validate_envelope, EnvelopeLimits};
use shared_types::Address;

/// Base gas cost.
const ENVELOPE_BASE_COST: u64 = 3_000;
/// Gas cost per word of calldata (hashing).
const ENVELOPE_WORD_COST: u64 = 12;

/// Envelope validator precompile.
pub struct EnvelopePrecompile {
    address: Address,
}

impl EnvelopePrecompile {
    /// Creates the precompile at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Precompile for EnvelopePrecompile {
    fn execute(
        &self,
        _ctx: &mut PrecompileContext<'_>,
        input: &[u8],
        gas_limit: u64,
    ) -> Result<PrecompileOutput, PrecompileError> {
        let gas_used = charge_gas(ENVELOPE_BASE_COST, ENVELOPE_WORD_COST, input.len(), gas_limit)?;

        let sel = selector_of(input)?;
        if sel != validateEnvelopeCall::SELECTOR {
            return Err(PrecompileError::UnknownSelector(hex::encode(sel)));
        }
        let call = validateEnvelopeCall::abi_decode(input)
            .map_err(|e| PrecompileError::InvalidInput(e.to_string()))?;

        let limits = EnvelopeLimits {
            max_header_bytes: usize_saturating(call.maxHeader),
            max_ciphertext_bytes: usize_saturating(call.maxCiphertext),
        };
        let envelope = validate_envelope(&call.header, &call.ciphertext, limits)
            .map_err(|e| PrecompileError::Reverted(e.to_string()))?;

        let output = EnvelopeReturns::abi_encode_params(&(
            envelope.valid,
            word(envelope.envelope_hash),
            envelope.version,
            word(envelope.dh_pub),
            envelope.pn,
            envelope.n,
            word(envelope.ad_hash),
        ));
        Ok(PrecompileOutput { gas_used, output })
    }

    fn address(&self) -> Address {
        self.address
    }
}
