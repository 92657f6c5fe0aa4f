//! Event extraction
//!
//! Turns a [`ResultDocument`] into the three sets of active event keys the
//! comparator works on. Inactive entries are counted but never keyed.

use crate::comparison::Category;
use crate::document::{DivisionEntry, ResultDocument};
use crate::types::{NodeId, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Canonical key of a division event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum DivisionKey {
    /// Legacy documents only know the dividing parent
    Parent(NodeId),
    /// Parent and both children, in document order
    ParentChildren(NodeId, NodeId, NodeId),
}

impl fmt::Display for DivisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivisionKey::Parent(id) => write!(f, "{}", id),
            DivisionKey::ParentChildren(parent, first, second) => {
                write!(f, "{} -> ({}, {})", parent, first, second)
            }
        }
    }
}

/// Active events of one document, plus the size of every input sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSets {
    pub detections: BTreeSet<NodeId>,
    pub moves: BTreeSet<(NodeId, NodeId)>,
    pub divisions: BTreeSet<DivisionKey>,
    /// Number of detection entries, active or not
    pub num_detections: usize,
    /// Number of linking entries, active or not
    pub num_moves: usize,
    /// Number of division entries, active or not
    pub num_divisions: usize,
}

impl EventSets {
    /// Parse, validate and extract a JSON result document in one step
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document = ResultDocument::from_json_str(json)?;
        Ok(extract(&document))
    }

    /// Number of distinct active events in a category
    pub fn active_count(&self, category: Category) -> usize {
        match category {
            Category::Detections => self.detections.len(),
            Category::Moves => self.moves.len(),
            Category::Divisions => self.divisions.len(),
        }
    }

    /// Number of entries in the source sequence of a category
    pub fn total_count(&self, category: Category) -> usize {
        match category {
            Category::Detections => self.num_detections,
            Category::Moves => self.num_moves,
            Category::Divisions => self.num_divisions,
        }
    }
}

/// Extract the active event sets of a validated document
pub fn extract(document: &ResultDocument) -> EventSets {
    let detections = document
        .detections
        .iter()
        .filter(|entry| entry.value.is_active())
        .map(|entry| entry.id)
        .collect();

    let moves = document
        .links
        .iter()
        .filter(|entry| entry.value.is_active())
        .map(|entry| (entry.src, entry.dest))
        .collect();

    let divisions = document
        .divisions
        .iter()
        .filter(|entry| entry.value().is_active())
        .filter_map(division_key)
        .collect();

    let sets = EventSets {
        detections,
        moves,
        divisions,
        num_detections: document.detections.len(),
        num_moves: document.links.len(),
        num_divisions: document.divisions.len(),
    };

    log::debug!(
        "Extracted {}/{} detections, {}/{} moves, {}/{} divisions ({:?})",
        sets.detections.len(),
        sets.num_detections,
        sets.moves.len(),
        sets.num_moves,
        sets.divisions.len(),
        sets.num_divisions,
        document.division_form
    );

    sets
}

fn division_key(entry: &DivisionEntry) -> Option<DivisionKey> {
    match *entry {
        DivisionEntry::ById { id, .. } => Some(DivisionKey::Parent(id)),
        DivisionEntry::ByParentChildren {
            parent,
            children: [first, second],
            ..
        } => Some(DivisionKey::ParentChildren(parent, first, second)),
        DivisionEntry::Inactive { .. } => None,
    }
}
