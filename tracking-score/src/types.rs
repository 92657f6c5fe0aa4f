//! Core types for the tracking scorer library
//!
//! This module defines the identifiers, activity values and error type shared
//! by the extractor and the comparator. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for scorer operations
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Identifier of a segmentation-hypothesis node
///
/// Ids are opaque: the scorer only compares them for equality and ordering.
/// Ground truth and candidate documents must refer to the same hypothesis
/// graph for a comparison to be meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Activity indicator attached to every result entry
///
/// Producers write either a boolean or a number (usually 0/1, sometimes the
/// number of objects assigned to a node). An entry counts as selected when
/// the value is truthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    Flag(bool),
    Number(f64),
}

impl Activity {
    /// True for `true` and for any nonzero number
    pub fn is_active(&self) -> bool {
        match *self {
            Activity::Flag(flag) => flag,
            Activity::Number(value) => value != 0.0,
        }
    }
}

impl From<bool> for Activity {
    fn from(flag: bool) -> Self {
        Activity::Flag(flag)
    }
}

/// Errors that can occur while reading or scoring result documents
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("Malformed entry {index} in {sequence}: {reason}")]
    MalformedEntry {
        sequence: &'static str,
        index: usize,
        reason: String,
    },

    #[error("Invalid result document: {0}")]
    InvalidDocument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Solver failed: {0}")]
    Solver(String),
}

impl ScoreError {
    pub(crate) fn malformed(
        sequence: &'static str,
        index: usize,
        reason: impl Into<String>,
    ) -> Self {
        ScoreError::MalformedEntry {
            sequence,
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_truthiness() {
        assert!(Activity::Flag(true).is_active());
        assert!(!Activity::Flag(false).is_active());
        assert!(Activity::Number(1.0).is_active());
        assert!(Activity::Number(2.0).is_active());
        assert!(!Activity::Number(0.0).is_active());
        assert_eq!(Activity::from(true), Activity::Flag(true));
    }

    #[test]
    fn test_activity_deserialization() {
        let flag: Activity = serde_json::from_str("true").unwrap();
        assert_eq!(flag, Activity::Flag(true));

        let number: Activity = serde_json::from_str("3").unwrap();
        assert_eq!(number, Activity::Number(3.0));

        assert!(serde_json::from_str::<Activity>("\"yes\"").is_err());
    }

    #[test]
    fn test_node_id_is_transparent() {
        let id: NodeId = serde_json::from_str("42").unwrap();
        assert_eq!(id, NodeId(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(NodeId::from(42), id);
    }

    #[test]
    fn test_malformed_entry_message() {
        let err = ScoreError::malformed("linkingResults", 3, "missing field `dest`");
        assert_eq!(
            err.to_string(),
            "Malformed entry 3 in linkingResults: missing field `dest`"
        );
    }
}
