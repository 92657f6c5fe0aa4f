//! Solver capability
//!
//! Tracking solutions are computed by an external optimization engine. This
//! library never implements one; it only defines the seam a caller plugs an
//! engine into, so a solver run can be scored directly against ground truth.

use crate::comparison::{compare, Comparison};
use crate::document::ResultDocument;
use crate::extract::{extract, EventSets};
use crate::types::Result;
use serde::{Deserialize, Serialize};

/// Hypothesis graph handed to a solver
///
/// The scorer does not look inside: segmentation and linking hypotheses,
/// their features and settings are the solver's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypothesisGraph(pub serde_json::Value);

/// Weight vector for the solver's energy terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub weights: Vec<f64>,
}

/// An engine producing a result document from a hypothesis graph
pub trait Solver {
    fn solve(&self, graph: &HypothesisGraph, weights: &Weights) -> Result<ResultDocument>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn solve(&self, graph: &HypothesisGraph, weights: &Weights) -> Result<ResultDocument> {
        (**self).solve(graph, weights)
    }
}

/// Run a solver and score its result against ground truth
pub fn evaluate_solver(
    solver: &dyn Solver,
    graph: &HypothesisGraph,
    weights: &Weights,
    ground_truth: &EventSets,
) -> Result<Comparison> {
    log::info!("Running solver with {} weights", weights.weights.len());
    let document = solver.solve(graph, weights)?;
    Ok(compare(ground_truth, &extract(&document)))
}
