//! # lsmon-cli
//!
//! Command-line front end for the lsmon fleet monitor:
//!
//! - Loads and validates the TOML configuration
//! - Initializes tracing from the configured log level
//! - Builds the fleet and drives the monitor's Start/Close lifecycle

mod args;
mod build;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lsmon_core::Config;
use lsmon_monitor::Monitor;

pub use args::{Args, Command};

/// CLI entry point.
pub async fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    match args.command.unwrap_or(Command::Run) {
        Command::CheckConfig => {
            println!("{}", summary(&config));
            println!("Configuration OK ({} nodes)", config.nodes.len());
            Ok(())
        }
        Command::Run => run_monitor(config).await,
    }
}

/// Load and validate the configuration file.
fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// One-line startup summary.
fn summary(config: &Config) -> String {
    let ddns = if config.ddns_enabled() { "on" } else { "off" };
    let notifier = if config.notify_enabled() { "on" } else { "off" };
    format!(
        "Log level: {}  (Concurrent: {}, DDNS: {}, Notifier: {})",
        config.log_level, config.concurrent, ddns, notifier
    )
}

/// Initialize the global tracing subscriber from the configured level.
fn init_tracing(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level {level:?}: {e}"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn run_monitor(config: Config) -> Result<()> {
    init_tracing(&config.log_level)?;
    println!("{}", summary(&config));

    let fleet = build::build_fleet(&config)?;
    let mut monitor = Monitor::new(&config, fleet)?;

    monitor.start().await;
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    monitor.close().await;

    Ok(())
}
