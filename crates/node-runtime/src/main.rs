//! # Ride Node
//!
//! Replays a JSON round script through the round executor and prints each
//! receipt as one JSON line on stdout.
//!
//! ```text
//! ride-node <script.json>
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `RIDE_*` environment)
//! 2. Install the log subscriber
//! 3. Validate configuration
//! 4. Replay the script

use anyhow::{bail, Context, Result};
use ride_node::logging::init_logging;
use ride_node::{NodeConfig, RoundScript};
use tracing::info;

fn main() -> Result<()> {
    let config = NodeConfig::from_env();
    init_logging(&config.logging)?;
    config.validate().context("invalid configuration")?;

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: ride-node <script.json>");
    };
    info!(script = %path, "Replaying round script");

    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let script = RoundScript::from_json(&json).with_context(|| format!("parsing {path}"))?;

    for receipt in script.replay(&config)? {
        println!("{}", serde_json::to_string(&receipt)?);
    }
    Ok(())
}
