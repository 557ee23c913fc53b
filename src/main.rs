//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `whois_relay` library that handles:
//! - Command-line argument parsing
//! - Logger and crypto provider initialization
//! - Exit status on fatal errors
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use whois_relay::initialization::{init_crypto_provider, init_logger_with};
use whois_relay::{run_server, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    if let Err(e) = run_server(config).await {
        log::error!("{:#}", e);
        eprintln!("whois_relay error: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
