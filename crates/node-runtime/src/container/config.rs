//! # Node Configuration
//!
//! Unified configuration for every component and the runtime itself.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `RIDE_MAX_TTL` | `registry.max_ttl` |
//! | `RIDE_MIN_DEPOSIT` | `registry.min_deposit` (decimal) |
//! | `RIDE_COMMIT_WINDOW` | `matching.commit_window` |
//! | `RIDE_MAX_MATCHES_PER_ROUND` | `matching.max_matches_per_round` |
//! | `RIDE_PENDING_RIDER_BPS` | `sessions.cancel_policy.pending_rider_bps` |
//! | `RIDE_ACTIVE_RIDER_BPS` | `sessions.cancel_policy.active_rider_bps` |
//! | `RIDE_MAX_HEADER_BYTES` | `sessions.envelope_limits.max_header_bytes` |
//! | `RIDE_MAX_CIPHERTEXT_BYTES` | `sessions.envelope_limits.max_ciphertext_bytes` |
//! | `RIDE_MAX_COORD_BYTES` | `sessions.max_coord_bytes` |
//! | `RIDE_REQUIRE_AD_BINDING` | `sessions.require_ad_binding` |
//! | `RIDE_CHAIN_ID` | `sessions.chain_id` |
//! | `RIDE_ENVELOPE_PRECOMPILE` | `precompiles.envelope_address` (hex) |
//! | `RIDE_KEYS_PRECOMPILE` | `precompiles.key_directory_address` (hex) |
//! | `RIDE_LOG_LEVEL` / `RUST_LOG` | `logging.level` |
//! | `RIDE_JSON_LOGS` | `logging.json` |
//!
//! Unparseable values are logged and ignored; the default stays in place.

use rc_01_request_registry::RegistryConfig;
use rc_03_matching_engine::MatchingConfig;
use rc_04_session_manager::{SessionConfig, BPS_DENOMINATOR};
use rc_05_envelope_validator::HEADER_LEN;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{is_zero_address, Address, U256};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Request Registry limits.
    pub registry: RegistryConfig,
    /// Matching pass tuning.
    pub matching: MatchingConfig,
    /// Session lifecycle and envelope policy.
    pub sessions: SessionConfig,
    /// Precompile addresses.
    pub precompiles: PrecompileConfig,
    /// Log output.
    pub logging: LogConfig,
}

/// Fixed precompile addresses.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompileConfig {
    /// EnvelopeValidator precompile.
    #[serde_as(as = "Hex")]
    pub envelope_address: Address,
    /// KeyDirectory precompile.
    #[serde_as(as = "Hex")]
    pub key_directory_address: Address,
}

/// Builds `0x000…0hilo`.
#[must_use]
pub const fn precompile_address(hi: u8, lo: u8) -> Address {
    let mut addr = [0u8; 20];
    addr[18] = hi;
    addr[19] = lo;
    addr
}

/// Default EnvelopeValidator address `0x…0a01`.
pub const ENVELOPE_PRECOMPILE: Address = precompile_address(0x0a, 0x01);

/// Default KeyDirectory address `0x…0a02`.
pub const KEY_DIRECTORY_PRECOMPILE: Address = precompile_address(0x0a, 0x02);

impl Default for PrecompileConfig {
    fn default() -> Self {
        Self {
            envelope_address: ENVELOPE_PRECOMPILE,
            key_directory_address: KEY_DIRECTORY_PRECOMPILE,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `rc_03_matching_engine=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_ttl` of zero rejects every request.
    #[error("registry.max_ttl must be at least 1")]
    ZeroMaxTtl,

    /// Basis points above 10000.
    #[error("{field} is {value} bps, above 10000")]
    InvalidBasisPoints {
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: u64,
    },

    /// Header limit below the fixed header size rejects every envelope.
    #[error("max_header_bytes {0} is below the fixed header length 73")]
    HeaderLimitTooSmall(usize),

    /// Coordinates could never be revealed.
    #[error("max_coord_bytes must be at least 1")]
    ZeroCoordLimit,

    /// Precompile address is zero or shared.
    #[error("invalid precompile addresses: {0}")]
    InvalidPrecompileAddress(&'static str),
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        override_parsed(&lookup, "RIDE_MAX_TTL", &mut config.registry.max_ttl);
        if let Some(raw) = lookup("RIDE_MIN_DEPOSIT") {
            match U256::from_dec_str(&raw) {
                Ok(v) => config.registry.min_deposit = v,
                Err(_) => warn!(value = %raw, "RIDE_MIN_DEPOSIT is not a decimal integer"),
            }
        }

        override_parsed(&lookup, "RIDE_COMMIT_WINDOW", &mut config.matching.commit_window);
        override_parsed(
            &lookup,
            "RIDE_MAX_MATCHES_PER_ROUND",
            &mut config.matching.max_matches_per_round,
        );

        let sessions = &mut config.sessions;
        override_parsed(
            &lookup,
            "RIDE_PENDING_RIDER_BPS",
            &mut sessions.cancel_policy.pending_rider_bps,
        );
        override_parsed(
            &lookup,
            "RIDE_ACTIVE_RIDER_BPS",
            &mut sessions.cancel_policy.active_rider_bps,
        );
        override_parsed(
            &lookup,
            "RIDE_MAX_HEADER_BYTES",
            &mut sessions.envelope_limits.max_header_bytes,
        );
        override_parsed(
            &lookup,
            "RIDE_MAX_CIPHERTEXT_BYTES",
            &mut sessions.envelope_limits.max_ciphertext_bytes,
        );
        override_parsed(&lookup, "RIDE_MAX_COORD_BYTES", &mut sessions.max_coord_bytes);
        override_parsed(&lookup, "RIDE_REQUIRE_AD_BINDING", &mut sessions.require_ad_binding);
        override_parsed(&lookup, "RIDE_CHAIN_ID", &mut sessions.chain_id);

        override_address(
            &lookup,
            "RIDE_ENVELOPE_PRECOMPILE",
            &mut config.precompiles.envelope_address,
        );
        override_address(
            &lookup,
            "RIDE_KEYS_PRECOMPILE",
            &mut config.precompiles.key_directory_address,
        );

        if let Some(level) = lookup("RIDE_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.logging.level = level;
        }
        if let Some(raw) = lookup("RIDE_JSON_LOGS") {
            config.logging.json = raw.eq_ignore_ascii_case("true") || raw == "1";
        }

        config
    }

    /// Rejects settings that would make the node unusable.
    ///
    /// # Errors
    /// The first inconsistent setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.max_ttl == 0 {
            return Err(ConfigError::ZeroMaxTtl);
        }

        let policy = &self.sessions.cancel_policy;
        for (field, value) in [
            ("pending_rider_bps", policy.pending_rider_bps),
            ("active_rider_bps", policy.active_rider_bps),
        ] {
            if value > BPS_DENOMINATOR {
                return Err(ConfigError::InvalidBasisPoints { field, value });
            }
        }

        let max_header = self.sessions.envelope_limits.max_header_bytes;
        if max_header > 0 && max_header < HEADER_LEN {
            return Err(ConfigError::HeaderLimitTooSmall(max_header));
        }
        if self.sessions.max_coord_bytes == 0 {
            return Err(ConfigError::ZeroCoordLimit);
        }

        let p = &self.precompiles;
        if is_zero_address(&p.envelope_address) || is_zero_address(&p.key_directory_address) {
            return Err(ConfigError::InvalidPrecompileAddress("zero address"));
        }
        if p.envelope_address == p.key_directory_address {
            return Err(ConfigError::InvalidPrecompileAddress("addresses collide"));
        }
        Ok(())
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable override"),
        }
    }
}

fn override_address(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut Address) {
    if let Some(raw) = lookup(key) {
        let decoded = hex::decode(raw.trim().trim_start_matches("0x")).ok();
        match decoded.and_then(|bytes| Address::try_from(bytes.as_slice()).ok()) {
            Some(address) => *target = address,
            None => warn!(key, value = %raw, "Address override must be 20 hex bytes"),
        }
    }
}
