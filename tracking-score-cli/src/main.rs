//! Tracking Score CLI Application
//!
//! Command-line interface for scoring tracking results against ground truth.
//! It uses the tracking-score library and adds:
//! - Comment-tolerant loading of JSON result files
//! - TOML configuration with command line overrides
//! - Parallel batch evaluation of several result files
//! - Report output (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod batch;
mod config;
mod input;
mod output;

use config::{AppConfig, CliOverrides, OutputFormat};

/// Tracking Score - Compare tracking results against a ground truth
#[derive(Parser, Debug)]
#[command(name = "tracking-score")]
#[command(
    about = "Compare two result json files, usually one of those is the ground truth",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Ground truth result file
    #[arg(long = "gt", value_name = "FILE")]
    ground_truth: Option<PathBuf>,

    /// Result file to evaluate (can be repeated)
    #[arg(short, long = "result", value_name = "FILE")]
    results: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of decimals for precision, recall and f-measure
    #[arg(long, value_name = "N")]
    decimals: Option<usize>,

    /// List false positive and false negative events per category
    #[arg(long)]
    list_mismatches: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            ground_truth: self.ground_truth.clone(),
            results: self.results.clone(),
            format: self.format,
            output_file: self.output.clone(),
            decimals: self.decimals,
            list_mismatches: self.list_mismatches,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Tracking Score CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using scorer library v{}", tracking_score::VERSION);

    // Load configuration, command line values win
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let config = config.with_overrides(args.overrides());
    config.validate()?;

    // Load ground truth
    let ground_truth_path = config
        .input
        .ground_truth
        .as_deref()
        .context("No ground truth file given")?;
    let ground_truth = input::load_event_sets(ground_truth_path)?;

    // Score every result file
    let evaluations = batch::evaluate_all(&ground_truth, &config.input.results)?;

    // Write report
    let report = output::render(&config.output, ground_truth_path, &evaluations)?;
    output::write_report(&config.output, &report)?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "tracking-score",
            "--gt",
            "gt.json",
            "--result",
            "a.json",
            "-r",
            "b.json",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.ground_truth, Some(PathBuf::from("gt.json")));
        assert_eq!(args.results.len(), 2);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.verbose, 2);

        let config = AppConfig::default().with_overrides(args.overrides());
        assert!(config.validate().is_ok());
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
