//! Text report generation
//!
//! Renders a [`Comparison`] as the plain text report: one block per category
//! followed by the pooled `overall` block.

use crate::comparison::{CategoryOutcome, CategoryResult, Comparison, EventKey};
use crate::metrics::Metric;
use std::fmt;

const DEFAULT_DECIMALS: usize = 3;
const SEPARATOR: &str = "=======================";

/// Configurable text rendering of a comparison
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    comparison: &'a Comparison,
    decimals: usize,
    list_mismatches: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(comparison: &'a Comparison) -> Self {
        Self {
            comparison,
            decimals: DEFAULT_DECIMALS,
            list_mismatches: false,
        }
    }

    /// Builder method: number of decimals for metric values
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Builder method: list false positive and false negative events
    pub fn with_mismatches(mut self, enabled: bool) -> Self {
        self.list_mismatches = enabled;
        self
    }

    fn write_outcome(
        &self,
        f: &mut fmt::Formatter<'_>,
        name: &str,
        outcome: &CategoryOutcome,
    ) -> fmt::Result {
        writeln!(f, "=== {} ===", name)?;

        let score = match outcome {
            CategoryOutcome::NoResults { .. } => {
                return writeln!(f, "\tno results found for this category");
            }
            CategoryOutcome::Scored(score) => score,
        };

        let counts = &score.counts;
        writeln!(
            f,
            "\t{} gt entries ({} active), {} in result ({} active)",
            counts.ground_truth_entries,
            counts.ground_truth_events,
            counts.candidate_entries,
            counts.candidate_events
        )?;
        writeln!(
            f,
            "\ttp: {}, fp: {}, fn: {}",
            counts.true_positives, counts.false_positives, counts.false_negatives
        )?;
        writeln!(f, "\tprecision: {}", self.metric(&score.precision))?;
        writeln!(f, "\trecall: {}", self.metric(&score.recall))?;
        writeln!(f, "\tf-measure: {}", self.metric(&score.f_measure))
    }

    fn write_mismatches(&self, f: &mut fmt::Formatter<'_>, result: &CategoryResult) -> fmt::Result {
        if !self.list_mismatches || result.outcome.score().is_none() {
            return Ok(());
        }
        writeln!(f, "\tfalse positives: {}", join_keys(&result.false_positives))?;
        writeln!(f, "\tfalse negatives: {}", join_keys(&result.false_negatives))
    }

    fn metric(&self, metric: &Metric) -> String {
        if metric.defined {
            format!("{:.*}", self.decimals, metric.value)
        } else {
            format!("{:.*} (undefined)", self.decimals, metric.value)
        }
    }
}

fn join_keys(keys: &[EventKey]) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.comparison.categories {
            self.write_outcome(f, result.category.name(), &result.outcome)?;
            self.write_mismatches(f, result)?;
            writeln!(f)?;
        }

        writeln!(f, "{}", SEPARATOR)?;
        self.write_outcome(f, "overall", &self.comparison.aggregate)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&TextReport::new(self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare;
    use crate::extract::EventSets;
    use crate::types::NodeId;

    fn sample() -> Comparison {
        let gt = EventSets {
            detections: [1, 2, 3].into_iter().map(NodeId).collect(),
            moves: [(NodeId(1), NodeId(2))].into_iter().collect(),
            num_detections: 3,
            num_moves: 1,
            ..Default::default()
        };
        let candidate = EventSets {
            detections: [1, 2].into_iter().map(NodeId).collect(),
            moves: [(NodeId(1), NodeId(2)), (NodeId(2), NodeId(3))].into_iter().collect(),
            num_detections: 2,
            num_moves: 2,
            ..Default::default()
        };
        compare(&gt, &candidate)
    }

    #[test]
    fn test_text_report_sections() {
        let text = sample().to_string();

        assert!(text.contains(
            "=== detections ===\n\t3 gt entries (3 active), 2 in result (2 active)"
        ));
        assert!(text.contains("\tprecision: 1.000\n\trecall: 0.667"));
        assert!(text.contains("=== moves ===\n\t1 gt entries (1 active), 2 in result (2 active)"));
        assert!(text.contains("=== divisions ===\n\tno results found for this category"));
        assert!(text.contains(
            "=== overall ===\n\t4 gt entries (4 active), 4 in result (4 active)"
        ));
        assert!(text.contains("\ttp: 3, fp: 1, fn: 1\n\tprecision: 0.750\n\trecall: 0.750"));
        assert!(!text.contains("false positives"));
    }

    #[test]
    fn test_decimals_and_mismatches() {
        let comparison = sample();
        let text = TextReport::new(&comparison)
            .with_decimals(1)
            .with_mismatches(true)
            .to_string();

        assert!(text.contains("\tprecision: 0.5\n"));
        assert!(text.contains("\tfalse positives: 2 -> 3"));
        assert!(text.contains("\tfalse negatives: 3"));
        assert!(text.contains("\tfalse positives: none"));
    }

    #[test]
    fn test_undefined_metric_is_flagged() {
        let gt = EventSets {
            detections: [1].into_iter().map(NodeId).collect(),
            num_detections: 1,
            ..Default::default()
        };
        let comparison = compare(&gt, &EventSets::default());
        let text = comparison.to_string();

        assert!(text.contains("\tprecision: 0.000 (undefined)"));
        assert!(text.contains("\trecall: 0.000\n"));
    }
}
