//! Tracking Solution Scorer Library
//!
//! A stateless library for scoring a cell tracking solution against ground
//! truth. Both are result documents listing detection, linking and division
//! hypotheses with an activity value each.
//!
//! # Architecture
//!
//! - [`document`]: wire format and eager validation into [`ResultDocument`]
//! - [`extract`]: active event sets per category ([`EventSets`])
//! - [`comparison`]: true/false positives and negatives per category, pooled aggregate
//! - [`report`]: plain text rendering
//! - [`solver`]: capability trait for plugging in an external tracking engine
//!
//! The library does NOT read files, parse command lines or compute tracking
//! solutions. File loading lives in the application layer (tracking-score-cli).
//!
//! # Example Usage
//!
//! ```
//! use tracking_score::{compare, Category, EventSets};
//!
//! let gt = EventSets::from_json_str(r#"{
//!     "detectionResults": [{"id": 1, "value": 1}, {"id": 2, "value": 1}],
//!     "linkingResults": [{"src": 1, "dest": 2, "value": 1}]
//! }"#).unwrap();
//! let result = EventSets::from_json_str(r#"{
//!     "detectionResults": [{"id": 1, "value": 1}, {"id": 2, "value": 0}],
//!     "linkingResults": [{"src": 1, "dest": 2, "value": true}]
//! }"#).unwrap();
//!
//! let comparison = compare(&gt, &result);
//! let detections = comparison.category(Category::Detections).unwrap();
//! assert_eq!(detections.outcome.counts().false_negatives, 1);
//! println!("{}", comparison);
//! ```

pub mod comparison;
pub mod document;
pub mod extract;
pub mod metrics;
pub mod report;
pub mod solver;
pub mod types;

// Re-export main types for convenience
pub use comparison::{compare, Category, CategoryOutcome, CategoryResult, Comparison, EventKey};
pub use document::{DetectionEntry, DivisionEntry, DivisionForm, LinkEntry, ResultDocument};
pub use extract::{extract, DivisionKey, EventSets};
pub use metrics::{CategoryScore, ConfusionCounts, Metric};
pub use report::TextReport;
pub use solver::{evaluate_solver, HypothesisGraph, Solver, Weights};
pub use types::{Activity, NodeId, Result, ScoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: two empty documents compare without any scored category
        let empty = EventSets::default();
        let comparison = compare(&empty, &empty);
        assert_eq!(comparison.categories.len(), 3);
        assert!(comparison.aggregate.score().is_none());
    }
}
