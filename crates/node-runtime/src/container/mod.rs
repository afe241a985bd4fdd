//! # Node Container
//!
//! Configuration for every component, loaded once at startup and handed to
//! the ledger state constructor.

pub mod config;

pub use config::{
    precompile_address, ConfigError, LogConfig, NodeConfig, PrecompileConfig,
    ENVELOPE_PRECOMPILE, KEY_DIRECTORY_PRECOMPILE,
};
