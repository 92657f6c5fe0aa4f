//! Result document loading
//!
//! Result files are JSON, but hand-edited ground truth often carries `//` and
//! `/* */` comments. Comments are blanked out with `json_comments` before
//! parsing.

use anyhow::{Context, Result};
use json_comments::StripComments;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracking_score::{extract, EventSets, ResultDocument};

/// Replace comments outside of string literals with whitespace
pub fn strip_comments(text: &str) -> std::io::Result<String> {
    let mut stripped = String::with_capacity(text.len());
    StripComments::new(text.as_bytes()).read_to_string(&mut stripped)?;
    Ok(stripped)
}

/// Read and validate a result document from disk
pub fn load_document(path: &Path) -> Result<ResultDocument> {
    log::info!("Loading result document: {:?}", path);

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read result file: {:?}", path))?;

    let text = strip_comments(&text)
        .with_context(|| format!("Failed to strip comments from result file: {:?}", path))?;

    let document = ResultDocument::from_json_str(&text)
        .with_context(|| format!("Failed to parse result file: {:?}", path))?;

    log::debug!(
        "{:?}: {} detections, {} links, {} divisions",
        path,
        document.detections.len(),
        document.links.len(),
        document.divisions.len()
    );
    Ok(document)
}

/// Read a result document and extract its event sets
pub fn load_event_sets(path: &Path) -> Result<EventSets> {
    Ok(extract(&load_document(path)?))
}
