//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── inspect: InspectConfig   # Input path, output format, summarizing
//! └── parse: ParseConfig       # Token id type-check mode
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! tessera inputs.json --format pretty --token-check all
//!
//! # Or via environment variables
//! TESSERA_FORMAT=pretty TOKEN_CHECK=all tessera inputs.json
//! ```

mod inspect;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use inspect::{InspectConfig, OutputFormat, is_stdin};
use tessera_inputs::ParseConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "tessera")]
#[command(about = "Inspect serialized request inputs through the unified adapter")]
#[command(version)]
pub struct Cli {
    /// What to read and how to print it.
    #[clap(flatten)]
    pub inspect: InspectConfig,

    /// How inputs are decoded.
    #[clap(flatten)]
    pub parse: ParseConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that stdout carries only the rendered inputs.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.inspect
            .validate()
            .context("invalid inspect configuration")?;
        Ok(())
    }

    /// Logs configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.inspect.log();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            token_check = %self.parse.token_check,
            "Parse configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tessera_inputs::ListCheck;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "tessera",
            "-",
            "--format",
            "pretty",
            "--summarize",
            "--token-check",
            "all",
        ])
        .unwrap();

        assert!(cli.inspect.reads_stdin());
        assert_eq!(cli.inspect.format, OutputFormat::Pretty);
        assert!(cli.inspect.summarize);
        assert_eq!(cli.parse.token_check, ListCheck::All);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_unknown_token_check_is_rejected() {
        let result = Cli::try_parse_from(["tessera", "-", "--token-check", "some"]);
        assert!(result.is_err());
    }
}
