//! Confusion counts and derived metrics
//!
//! Precision and recall are plain ratios over raw counts. A ratio whose
//! denominator is zero is reported as 0 and marked undefined, so callers can
//! keep aggregating without special cases.

use serde::Serialize;
use std::collections::BTreeSet;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Confusion counts for one category, or pooled over several
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Entries in the ground truth sequence, active or not
    pub ground_truth_entries: usize,
    /// Entries in the candidate sequence, active or not
    pub candidate_entries: usize,
    /// Distinct active ground truth events
    pub ground_truth_events: usize,
    /// Distinct active candidate events
    pub candidate_events: usize,
}

impl ConfusionCounts {
    /// Compare two sets of active event keys
    pub fn from_sets<K: Ord>(
        ground_truth: &BTreeSet<K>,
        candidate: &BTreeSet<K>,
        ground_truth_entries: usize,
        candidate_entries: usize,
    ) -> Self {
        let true_positives = ground_truth.intersection(candidate).count();

        Self {
            true_positives,
            false_positives: candidate.len() - true_positives,
            false_negatives: ground_truth.len() - true_positives,
            ground_truth_entries,
            candidate_entries,
            ground_truth_events: ground_truth.len(),
            candidate_events: candidate.len(),
        }
    }

    /// True when neither side has a single entry for this category
    pub fn is_empty(&self) -> bool {
        self.ground_truth_entries == 0 && self.candidate_entries == 0
    }

    pub fn precision(&self) -> Metric {
        precision(self.true_positives, self.false_positives)
    }

    pub fn recall(&self) -> Metric {
        recall(self.true_positives, self.false_negatives)
    }
}

impl Add for ConfusionCounts {
    type Output = ConfusionCounts;

    fn add(mut self, other: ConfusionCounts) -> ConfusionCounts {
        self += other;
        self
    }
}

impl AddAssign for ConfusionCounts {
    fn add_assign(&mut self, other: ConfusionCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.ground_truth_entries += other.ground_truth_entries;
        self.candidate_entries += other.candidate_entries;
        self.ground_truth_events += other.ground_truth_events;
        self.candidate_events += other.candidate_events;
    }
}

impl Sum for ConfusionCounts {
    fn sum<I: Iterator<Item = ConfusionCounts>>(iter: I) -> Self {
        iter.fold(ConfusionCounts::default(), Add::add)
    }
}

/// A ratio that may be undefined
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metric {
    pub value: f64,
    /// False when the denominator was zero and `value` is a placeholder 0
    pub defined: bool,
}

impl Metric {
    pub fn defined(value: f64) -> Self {
        Self {
            value,
            defined: true,
        }
    }

    pub fn undefined() -> Self {
        Self {
            value: 0.0,
            defined: false,
        }
    }

    fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Self::undefined()
        } else {
            Self::defined(numerator as f64 / denominator as f64)
        }
    }
}

/// `tp / (tp + fp)`
pub fn precision(true_positives: usize, false_positives: usize) -> Metric {
    Metric::ratio(true_positives, true_positives + false_positives)
}

/// `tp / (tp + fn)`
pub fn recall(true_positives: usize, false_negatives: usize) -> Metric {
    Metric::ratio(true_positives, true_positives + false_negatives)
}

/// Harmonic mean of precision and recall, 0 when both are 0
pub fn f_measure(precision: &Metric, recall: &Metric) -> Metric {
    let sum = precision.value + recall.value;
    if sum == 0.0 {
        Metric::undefined()
    } else {
        Metric::defined(2.0 * precision.value * recall.value / sum)
    }
}

/// Precision, recall and F-measure derived from one set of counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub counts: ConfusionCounts,
    pub precision: Metric,
    pub recall: Metric,
    pub f_measure: Metric,
}

impl CategoryScore {
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let precision = counts.precision();
        let recall = counts.recall();
        let f_measure = f_measure(&precision, &recall);

        Self {
            counts,
            precision,
            recall,
            f_measure,
        }
    }
}
