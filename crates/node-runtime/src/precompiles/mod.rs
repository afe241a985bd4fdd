//! # Precompiled Contracts
//!
//! Contract-callable entry points for the stateless envelope check and the
//! key directory, at fixed addresses (defaults `0x…0a01`, `0x…0a02`).
//!
//! Gas is `base + per_word * ceil(len(input) / 32)`, charged up front.
//! A structural rejection reverts with the component's error message.

pub mod envelope;
pub mod interface;
pub mod key_directory;

use crate::container::PrecompileConfig;
use rc_06_key_directory::KeyDirectory;
use shared_types::{Address, BlockContext, EventSink};
use thiserror::Error;

pub use envelope::EnvelopePrecompile;
pub use key_directory::KeyDirectoryPrecompile;

/// Precompile failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecompileError {
    /// Gas limit below the call's cost.
    #[error("out of gas: required {required}, limit {limit}")]
    OutOfGas {
        /// Cost of the call.
        required: u64,
        /// Caller-supplied limit.
        limit: u64,
    },

    /// Calldata could not be decoded.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No function with this selector.
    #[error("unknown selector 0x{0}")]
    UnknownSelector(String),

    /// The component rejected the call.
    #[error("reverted: {0}")]
    Reverted(String),
}

/// Precompile execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Gas used by the precompile.
    pub gas_used: u64,
    /// ABI-encoded return data.
    pub output: Vec<u8>,
}

/// What a precompile may see and touch during a call.
pub struct PrecompileContext<'a> {
    /// Account that issued the call.
    pub caller: Address,
    /// Clock of the current round.
    pub block: BlockContext,
    /// Key bundle table.
    pub keys: &'a mut KeyDirectory,
    /// Event sink of the current round.
    pub events: &'a mut dyn EventSink,
}

/// Trait for precompiled contracts.
pub trait Precompile: Send + Sync {
    /// Execute the precompile with given input.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Caller, clock and tables
    /// * `input` - Calldata including the 4-byte selector
    /// * `gas_limit` - Maximum gas available
    fn execute(
        &self,
        ctx: &mut PrecompileContext<'_>,
        input: &[u8],
        gas_limit: u64,
    ) -> Result<PrecompileOutput, PrecompileError>;

    /// Get the address of this precompile.
    fn address(&self) -> Address;
}

/// ABI word size.
const WORD: usize = 32;

/// Leading 4-byte function selector of `input`.
///
/// # Errors
/// `InvalidInput` if `input` is shorter than a selector.
pub fn selector_of(input: &[u8]) -> Result<[u8; 4], PrecompileError> {
    input
        .get(..4)
        .and_then(|sel| <[u8; 4]>::try_from(sel).ok())
        .ok_or_else(|| {
            PrecompileError::InvalidInput(format!(
                "calldata of {} bytes has no selector",
                input.len()
            ))
        })
}

/// `base + per_word * words(input)`, or `OutOfGas` above the limit.
///
/// # Errors
/// `OutOfGas` if the cost exceeds `gas_limit`.
pub fn charge_gas(
    base: u64,
    per_word: u64,
    input_len: usize,
    gas_limit: u64,
) -> Result<u64, PrecompileError> {
    let words = input_len.div_ceil(WORD) as u64;
    let required = base.saturating_add(per_word.saturating_mul(words));
    if required > gas_limit {
        return Err(PrecompileError::OutOfGas {
            required,
            limit: gas_limit,
        });
    }
    Ok(required)
}

/// Check if an address is a precompile and execute it.
///
/// Returns `None` when nothing is installed at `address`.
pub fn execute_precompile(
    config: &PrecompileConfig,
    address: Address,
    ctx: &mut PrecompileContext<'_>,
    input: &[u8],
    gas_limit: u64,
) -> Option<Result<PrecompileOutput, PrecompileError>> {
    let envelope = EnvelopePrecompile::new(config.envelope_address);
    let key_directory = KeyDirectoryPrecompile::new(config.key_directory_address);
    let installed: [&dyn Precompile; 2] = [&envelope, &key_directory];

    let result = installed
        .into_iter()
        .find(|precompile| precompile.address() == address)
        .map(|precompile| precompile.execute(ctx, input, gas_limit));
    result
}

// =============================================================================
// TESTS
// =============================================================================
