//! Input and output configuration.

use std::path::{Path, PathBuf};

use anyhow::{Result as AnyhowResult, anyhow};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Path that selects standard input.
const STDIN_PATH: &str = "-";

/// Rendering of the inspected inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One compact JSON document per line.
    #[default]
    Json,
    /// A single indented JSON document.
    Pretty,
}

/// What to read and how to print it.
///
/// # Environment Variables
///
/// - `TESSERA_FORMAT` - output format (default: json)
/// - `TESSERA_SUMMARIZE` - replace payload leaves with their JSON kind
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct InspectConfig {
    /// File holding one serialized input object or an array of them.
    ///
    /// Use "-" to read from standard input.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format.
    #[arg(long, env = "TESSERA_FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    #[serde(default)]
    pub format: OutputFormat,

    /// Print the JSON kind of every payload leaf instead of its value.
    ///
    /// Keeps the shape of each payload, which is useful for large tensors.
    #[arg(long, env = "TESSERA_SUMMARIZE")]
    #[serde(default)]
    pub summarize: bool,
}

impl InspectConfig {
    /// Creates a configuration that reads `path` and prints compact JSON.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: OutputFormat::default(),
            summarize: false,
        }
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables leaf summarizing.
    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// Returns true if inputs are read from standard input.
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        is_stdin(&self.path)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or names something other than
    /// an existing file.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("Input path cannot be empty"));
        }

        if !self.reads_stdin() && !self.path.is_file() {
            return Err(anyhow!(
                "Input path {} is not a readable file",
                self.path.display()
            ));
        }

        Ok(())
    }

    /// Logs the configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            path = %self.path.display(),
            stdin = self.reads_stdin(),
            format = ?self.format,
            summarize = self.summarize,
            "Inspect configuration"
        );
    }
}

/// Returns true if `path` selects standard input.
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_stdin_is_always_valid() {
        let config = InspectConfig::new("-");
        assert!(config.reads_stdin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_existing_file_is_valid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();

        let config = InspectConfig::new(file.path()).with_format(OutputFormat::Pretty);
        assert!(!config.reads_stdin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();

        assert!(InspectConfig::new(dir.path().join("absent.json")).validate().is_err());
        assert!(InspectConfig::new(dir.path()).validate().is_err());
        assert!(InspectConfig::new("").validate().is_err());
    }
}
