//! # Knead
//!
//! Interactive shell over a crafting context.
//!
//! Usage: `knead [config.toml]`. Without an argument `knead.toml` in the
//! current directory is used if present. Commands are read from stdin.
//! `knead --write-config [path]` writes the default configuration and exits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod shell;

use std::io;

use anyhow::{Context, Result};
use knead_crafting::{Catalog, CraftingContext};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{CliConfig, CONFIG_FILE};
use crate::shell::Shell;

/// Main entry point.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();
    if first.as_deref() == Some("--write-config") {
        let path = args.next().unwrap_or_else(|| CONFIG_FILE.to_string());
        CliConfig::default()
            .save_to(&path)
            .with_context(|| format!("failed to write {path}"))?;
        println!("Wrote default configuration to {path}");
        return Ok(());
    }

    let config_path = first.unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = CliConfig::load_from(&config_path);

    // Logs go to stderr so they never interleave with shell output.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    info!("Knead starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Config: {config_path}");

    let catalog = match &config.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::seed().context("embedded seed catalog is invalid")?,
    };

    let mut shell = Shell::new(CraftingContext::new(catalog), config);
    shell.run(io::stdin().lock(), io::stdout().lock())?;

    info!("Knead shutdown complete");
    Ok(())
}
