//! Batch evaluation
//!
//! Several candidate files can be scored against one ground truth. Each
//! comparison is independent, so they run in parallel; results keep the
//! order the files were given in.

use crate::input::load_event_sets;
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracking_score::{compare, Comparison, EventSets};

/// Comparison of one candidate file against the ground truth
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result_path: PathBuf,
    pub comparison: Comparison,
}

/// Score every result file against the ground truth
pub fn evaluate_all(
    ground_truth: &EventSets,
    result_paths: &[PathBuf],
) -> Result<Vec<Evaluation>> {
    log::info!("Evaluating {} result file(s)", result_paths.len());

    result_paths
        .par_iter()
        .map(|path| evaluate_one(ground_truth, path))
        .collect()
}

fn evaluate_one(ground_truth: &EventSets, path: &Path) -> Result<Evaluation> {
    let candidate = load_event_sets(path)?;
    Ok(Evaluation {
        result_path: path.to_path_buf(),
        comparison: compare(ground_truth, &candidate),
    })
}
