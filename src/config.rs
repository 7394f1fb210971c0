//! Run configuration
//!
//! Settings come from the command line (or its environment variable
//! fallbacks) and are validated once before the merge starts.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Result, config_invalid};

/// Default output file name
pub const OUTPUT_FILENAME: &str = "generated_presets.json";

/// Resolved settings for one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Directory scanned for inputs and receiving the output
    pub directory: PathBuf,
    /// Output file name inside `directory`
    pub output_name: String,
    /// Run everything except the final write
    pub dry_run: bool,
}

impl MergeConfig {
    /// Config for `directory` with default output name
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            output_name: OUTPUT_FILENAME.to_string(),
            dry_run: false,
        }
    }

    /// Build and validate a config from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::new(cli.dir.clone().unwrap_or_else(|| PathBuf::from(".")));
        if let Some(output) = &cli.output {
            config.output_name.clone_from(output);
        }
        config.dry_run = cli.dry_run;
        config.validate()?;
        Ok(config)
    }

    /// Full path of the output file
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.output_name)
    }

    /// The output must be a bare `*.json` name so it is excluded from inputs
    pub fn validate(&self) -> Result<()> {
        let name = self.output_name.as_str();
        if name.is_empty() {
            return Err(config_invalid("output name must not be empty"));
        }
        if name.contains('/') || name.contains('\\') || Path::new(name).file_name().is_none() {
            return Err(config_invalid(format!(
                "output name '{name}' must be a plain file name without path separators"
            )));
        }
        if name.starts_with('.') || !name.ends_with(".json") {
            return Err(config_invalid(format!(
                "output name '{name}' must be a visible file name ending in .json"
            )));
        }
        Ok(())
    }
}
