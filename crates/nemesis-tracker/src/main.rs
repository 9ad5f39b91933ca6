//! # Nemesis
//!
//! Command line entry point for the crafting recipe tracker.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use clap::Parser;
use nemesis_tracker::cli::{dispatch, Cli};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Logs go to stderr so the report stays clean on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("nemesis=info".parse()?))
        .init();

    debug!("Nemesis version: {}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    dispatch(cli, &mut std::io::stdout().lock())
}
