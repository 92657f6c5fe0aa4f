//! Configuration loading and parsing
//!
//! Every setting can come from an optional `config.toml` and be overridden on
//! the command line.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub ground_truth: Option<PathBuf>,
    #[serde(default)]
    pub results: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub list_mismatches: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
            output_file: None,
            list_mismatches: false,
        }
    }
}

fn default_decimals() -> usize {
    3
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Settings given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub ground_truth: Option<PathBuf>,
    pub results: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub decimals: Option<usize>,
    pub list_mismatches: bool,
}

impl AppConfig {
    /// Apply command line values; result files given there replace the configured list
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(ground_truth) = overrides.ground_truth {
            self.input.ground_truth = Some(ground_truth);
        }
        if !overrides.results.is_empty() {
            self.input.results = overrides.results;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(output_file) = overrides.output_file {
            self.output.output_file = Some(output_file);
        }
        if let Some(decimals) = overrides.decimals {
            self.output.decimals = decimals;
        }
        self.output.list_mismatches |= overrides.list_mismatches;
        self
    }

    /// Check that there is something to compare
    pub fn validate(&self) -> Result<()> {
        if self.input.ground_truth.is_none() {
            bail!("No ground truth file given (use --gt or [input] ground_truth)");
        }
        if self.input.results.is_empty() {
            bail!("No result file given (use --result or [input] results)");
        }
        if self.output.decimals > 12 {
            bail!("Too many decimals requested: {}", self.output.decimals);
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
