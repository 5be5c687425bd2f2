//! `matchday` binary.

use anyhow::{Context, Result};
use clap::Parser;
use matchday_cli::Cli;
use matchday_core::Config;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_root(dir);
    }
    config.validate()?;

    let store = config.open_store();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    matchday_cli::run(cli.command, &store, stdin.lock(), &mut stdout)
}
