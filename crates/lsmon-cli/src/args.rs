//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Monitors a fleet of cloud nodes and swaps blocked public addresses.
#[derive(Debug, Parser)]
#[command(name = "lsmon", version, about)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "LSMON_CONFIG", default_value = "lsmon.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the monitor daemon (the default)
    Run,

    /// Validate the configuration file and print a summary
    CheckConfig,
}
