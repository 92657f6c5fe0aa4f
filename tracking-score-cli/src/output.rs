//! Report output (TXT/JSON)

use crate::batch::Evaluation;
use crate::config::{OutputConfig, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracking_score::{Comparison, TextReport};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    version: &'static str,
    ground_truth: &'a Path,
    evaluations: Vec<JsonEvaluation<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonEvaluation<'a> {
    result: &'a Path,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

/// Render all evaluations in the configured format
pub fn render(
    config: &OutputConfig,
    ground_truth: &Path,
    evaluations: &[Evaluation],
) -> Result<String> {
    match config.format {
        OutputFormat::Txt => Ok(render_text(config, ground_truth, evaluations)),
        OutputFormat::Json => render_json(ground_truth, evaluations),
    }
}

fn render_text(config: &OutputConfig, ground_truth: &Path, evaluations: &[Evaluation]) -> String {
    let mut out = String::new();
    for evaluation in evaluations {
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "Ground truth: {}\nResult:       {}\n",
            ground_truth.display(),
            evaluation.result_path.display()
        );
        let report = TextReport::new(&evaluation.comparison)
            .with_decimals(config.decimals)
            .with_mismatches(config.list_mismatches);
        let _ = writeln!(out, "{}\n", report);
    }
    out
}

fn render_json(ground_truth: &Path, evaluations: &[Evaluation]) -> Result<String> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        version: tracking_score::VERSION,
        ground_truth,
        evaluations: evaluations
            .iter()
            .map(|evaluation| JsonEvaluation {
                result: &evaluation.result_path,
                comparison: &evaluation.comparison,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
}

/// Write the report to the configured file, or stdout
pub fn write_report(config: &OutputConfig, report: &str) -> Result<()> {
    match &config.output_file {
        Some(path) => {
            fs::write(path, report)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(report.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}
