mod commands;
mod config;
mod dataset;
mod errors;
mod integration;
mod models;
mod synthesis;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::Cli;
use crate::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (.env, then process environment)
    let config = Config::from_env()?;

    // Initialize structured logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting jobprep v{}", env!("CARGO_PKG_VERSION"));

    commands::dispatch(cli, &config)
}
