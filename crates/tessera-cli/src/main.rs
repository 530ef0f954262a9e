#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod inspect;

use std::io::{self, Write};
use std::process;

use anyhow::Context;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "tessera_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "tessera_cli::config";
pub const TRACING_TARGET_INSPECT: &str = "tessera_cli::inspect";

fn main() {
    let Err(error) = run() else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %error,
            "Inspection failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate().context("invalid configuration")?;

    let text = inspect::read_source(&cli.inspect.path)?;
    let adapters = inspect::load_adapters(&text, &cli.parse)?;
    let rendered = inspect::render(&adapters, &cli.inspect)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write to stdout")?;

    Ok(())
}
