//! Set comparison between a ground truth and a candidate
//!
//! Each category is scored independently. The aggregate pools the raw counts
//! of all three categories and derives its metrics from the pooled counts;
//! it is not an average of the per-category F-measures.

use crate::extract::{DivisionKey, EventSets};
use crate::metrics::{CategoryScore, ConfusionCounts};
use crate::types::NodeId;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Detections,
    Moves,
    Divisions,
}

impl Category {
    /// All categories, in report order
    pub const ALL: [Category; 3] = [Category::Detections, Category::Moves, Category::Divisions];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Detections => "detections",
            Category::Moves => "moves",
            Category::Divisions => "divisions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of a single event, whatever its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum EventKey {
    Detection(NodeId),
    Move(NodeId, NodeId),
    Division(DivisionKey),
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Detection(id) => write!(f, "{}", id),
            EventKey::Move(src, dest) => write!(f, "{} -> {}", src, dest),
            EventKey::Division(key) => write!(f, "{}", key),
        }
    }
}

/// Scoring result of one category (or of the pooled aggregate)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryOutcome {
    /// Neither document has any entry for this category
    NoResults { counts: ConfusionCounts },
    Scored(CategoryScore),
}

impl CategoryOutcome {
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        if counts.is_empty() {
            CategoryOutcome::NoResults { counts }
        } else {
            CategoryOutcome::Scored(CategoryScore::from_counts(counts))
        }
    }

    pub fn counts(&self) -> ConfusionCounts {
        match self {
            CategoryOutcome::NoResults { counts } => *counts,
            CategoryOutcome::Scored(score) => score.counts,
        }
    }

    pub fn score(&self) -> Option<&CategoryScore> {
        match self {
            CategoryOutcome::NoResults { .. } => None,
            CategoryOutcome::Scored(score) => Some(score),
        }
    }
}

/// Outcome of one category together with the mismatching events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub category: Category,
    pub outcome: CategoryOutcome,
    /// Candidate events missing from the ground truth, sorted
    pub false_positives: Vec<EventKey>,
    /// Ground truth events missing from the candidate, sorted
    pub false_negatives: Vec<EventKey>,
}

/// Full comparison of a candidate against a ground truth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub categories: Vec<CategoryResult>,
    pub aggregate: CategoryOutcome,
}

impl Comparison {
    /// Result for a single category
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.iter().find(|result| result.category == category)
    }
}

/// Compare the event sets of a candidate against the ground truth
pub fn compare(ground_truth: &EventSets, candidate: &EventSets) -> Comparison {
    let categories = vec![
        compare_category(
            Category::Detections,
            &ground_truth.detections,
            &candidate.detections,
            (ground_truth.num_detections, candidate.num_detections),
            EventKey::Detection,
        ),
        compare_category(
            Category::Moves,
            &ground_truth.moves,
            &candidate.moves,
            (ground_truth.num_moves, candidate.num_moves),
            |(src, dest)| EventKey::Move(src, dest),
        ),
        compare_category(
            Category::Divisions,
            &ground_truth.divisions,
            &candidate.divisions,
            (ground_truth.num_divisions, candidate.num_divisions),
            EventKey::Division,
        ),
    ];

    let pooled: ConfusionCounts = categories.iter().map(|result| result.outcome.counts()).sum();
    let aggregate = CategoryOutcome::from_counts(pooled);

    Comparison {
        categories,
        aggregate,
    }
}

fn compare_category<K, F>(
    category: Category,
    ground_truth: &BTreeSet<K>,
    candidate: &BTreeSet<K>,
    (ground_truth_entries, candidate_entries): (usize, usize),
    to_key: F,
) -> CategoryResult
where
    K: Ord + Copy,
    F: Fn(K) -> EventKey,
{
    let counts = ConfusionCounts::from_sets(
        ground_truth,
        candidate,
        ground_truth_entries,
        candidate_entries,
    );
    let outcome = CategoryOutcome::from_counts(counts);

    match &outcome {
        CategoryOutcome::NoResults { .. } => {
            log::debug!("No {} in either document", category);
        }
        CategoryOutcome::Scored(score) => {
            if !score.precision.defined {
                log::warn!(
                    "Precision for {} is undefined: candidate has no active events",
                    category
                );
            }
            if !score.recall.defined {
                log::warn!(
                    "Recall for {} is undefined: ground truth has no active events",
                    category
                );
            }
        }
    }

    CategoryResult {
        category,
        outcome,
        false_positives: candidate.difference(ground_truth).copied().map(&to_key).collect(),
        false_negatives: ground_truth.difference(candidate).copied().map(&to_key).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[u64]) -> BTreeSet<NodeId> {
        items.iter().map(|&id| NodeId(id)).collect()
    }

    fn sets(detections: &[u64], moves: &[(u64, u64)], divisions: &[u64]) -> EventSets {
        EventSets {
            detections: ids(detections),
            moves: moves.iter().map(|&(a, b)| (NodeId(a), NodeId(b))).collect(),
            divisions: divisions.iter().map(|&id| DivisionKey::Parent(NodeId(id))).collect(),
            num_detections: detections.len(),
            num_moves: moves.len(),
            num_divisions: divisions.len(),
        }
    }

    #[test]
    fn test_identical_sets_score_one() {
        let gt = sets(&[1, 2, 3], &[(1, 2), (2, 3)], &[2]);
        let comparison = compare(&gt, &gt.clone());

        for result in &comparison.categories {
            let score = result.outcome.score().unwrap();
            assert_eq!(score.precision.value, 1.0);
            assert_eq!(score.recall.value, 1.0);
            assert_eq!(score.f_measure.value, 1.0);
            assert!(result.false_positives.is_empty());
            assert!(result.false_negatives.is_empty());
        }

        let aggregate = comparison.aggregate.score().unwrap();
        assert_eq!(aggregate.precision.value, 1.0);
        assert_eq!(aggregate.recall.value, 1.0);
        assert_eq!(aggregate.f_measure.value, 1.0);
    }

    #[test]
    fn test_empty_candidate() {
        let gt = sets(&[1, 2], &[], &[]);
        let candidate = sets(&[], &[], &[]);
        let comparison = compare(&gt, &candidate);

        let detections = comparison.category(Category::Detections).unwrap();
        let score = detections.outcome.score().unwrap();
        assert_eq!(score.precision.value, 0.0);
        assert!(!score.precision.defined);
        assert_eq!(score.recall.value, 0.0);
        assert!(score.recall.defined);
        assert_eq!(score.f_measure.value, 0.0);
        assert_eq!(detections.false_negatives.len(), 2);
    }

    #[test]
    fn test_degenerate_category_reports_no_results() {
        let gt = sets(&[1], &[], &[]);
        let comparison = compare(&gt, &gt.clone());

        let moves = comparison.category(Category::Moves).unwrap();
        assert!(matches!(moves.outcome, CategoryOutcome::NoResults { .. }));
        assert!(moves.outcome.score().is_none());
    }

    #[test]
    fn test_inactive_only_category_is_scored() {
        let mut gt = sets(&[1], &[], &[]);
        gt.num_divisions = 2;
        let candidate = gt.clone();

        let comparison = compare(&gt, &candidate);
        let divisions = comparison.category(Category::Divisions).unwrap();
        let score = divisions.outcome.score().unwrap();
        assert!(!score.precision.defined);
        assert!(!score.recall.defined);
    }

    #[test]
    fn test_aggregate_is_sum_of_categories() {
        let gt = sets(&[1, 2, 3, 4], &[(1, 2), (3, 4)], &[1]);
        let candidate = sets(&[1, 2, 5], &[(1, 2), (2, 3)], &[1, 3]);
        let comparison = compare(&gt, &candidate);

        let total = comparison.aggregate.counts();
        let per_category: Vec<_> = comparison
            .categories
            .iter()
            .map(|r| r.outcome.counts())
            .collect();
        let tp: usize = per_category.iter().map(|c| c.true_positives).sum();
        let fp: usize = per_category.iter().map(|c| c.false_positives).sum();
        let fn_: usize = per_category.iter().map(|c| c.false_negatives).sum();

        assert_eq!(total.true_positives, tp);
        assert_eq!(total.false_positives, fp);
        assert_eq!(total.false_negatives, fn_);
    }

    #[test]
    fn test_aggregate_is_not_mean_of_f_measures() {
        // detections: p = 1.0, r = 0.1; moves: p = 0.5, r = 1.0
        let gt = sets(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], &[(1, 2)], &[]);
        let candidate = sets(&[1], &[(1, 2), (2, 3)], &[]);
        let comparison = compare(&gt, &candidate);

        let mean_f: f64 = comparison
            .categories
            .iter()
            .filter_map(|r| r.outcome.score())
            .map(|s| s.f_measure.value)
            .sum::<f64>()
            / 2.0;

        let aggregate = comparison.aggregate.score().unwrap();
        // pooled: tp = 2, fp = 1, fn = 9
        assert!((aggregate.precision.value - 2.0 / 3.0).abs() < 1e-12);
        assert!((aggregate.recall.value - 2.0 / 11.0).abs() < 1e-12);
        assert!((aggregate.f_measure.value - mean_f).abs() > 1e-3);
    }

    #[test]
    fn test_swapping_documents() {
        let gt = sets(&[1, 2, 3], &[(1, 2)], &[]);
        let candidate = sets(&[2, 3, 4, 5], &[(1, 2), (3, 4)], &[]);

        let forward = compare(&gt, &candidate);
        let backward = compare(&candidate, &gt);

        for category in Category::ALL {
            let f = forward.category(category).unwrap().outcome.counts();
            let b = backward.category(category).unwrap().outcome.counts();
            assert_eq!(f.true_positives, b.true_positives);
            assert_eq!(f.false_positives, b.false_negatives);
            assert_eq!(f.false_negatives, b.false_positives);
        }
    }

    #[test]
    fn test_mismatches_are_listed() {
        let gt = sets(&[1, 2], &[(1, 2)], &[]);
        let candidate = sets(&[2, 3], &[(1, 3)], &[]);
        let comparison = compare(&gt, &candidate);

        let moves = comparison.category(Category::Moves).unwrap();
        assert_eq!(moves.false_positives, vec![EventKey::Move(NodeId(1), NodeId(3))]);
        assert_eq!(moves.false_negatives, vec![EventKey::Move(NodeId(1), NodeId(2))]);
        assert_eq!(moves.false_positives[0].to_string(), "1 -> 3");
    }
}
