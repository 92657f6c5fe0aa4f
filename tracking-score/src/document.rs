//! Result document model
//!
//! A result document is what a tracking run (or an annotated ground truth)
//! produces: one entry per detection, link and division hypothesis, each with
//! an activity value. The wire format is read into loosely typed records first
//! and then validated eagerly into [`ResultDocument`], so a missing field is
//! reported with the sequence and index it came from.

use crate::types::{Activity, NodeId, Result, ScoreError};
use serde::{Deserialize, Serialize};

pub(crate) const DETECTION_RESULTS: &str = "detectionResults";
pub(crate) const LINKING_RESULTS: &str = "linkingResults";
pub(crate) const DIVISION_RESULTS: &str = "divisionResults";

/// Document as it appears on the wire, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResultDocument {
    #[serde(rename = "detectionResults")]
    pub detection_results: Option<Vec<RawDetectionEntry>>,
    #[serde(rename = "linkingResults")]
    pub linking_results: Option<Vec<RawLinkEntry>>,
    #[serde(rename = "divisionResults", default)]
    pub division_results: Option<Vec<RawDivisionEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetectionEntry {
    pub id: Option<NodeId>,
    pub value: Option<Activity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinkEntry {
    pub src: Option<NodeId>,
    pub dest: Option<NodeId>,
    pub value: Option<Activity>,
}

/// Division entry in either of the two wire forms
///
/// Legacy producers only write the parent `id`; newer ones name the parent
/// and both children explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDivisionEntry {
    pub id: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub children: Option<Vec<NodeId>>,
    pub value: Option<Activity>,
}

impl RawDivisionEntry {
    fn has_explicit_fields(&self) -> bool {
        self.parent.is_some() && self.children.is_some()
    }

    fn is_active(&self) -> bool {
        self.value.map_or(false, |v| v.is_active())
    }
}

/// A validated detection entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionEntry {
    pub id: NodeId,
    pub value: Activity,
}

impl DetectionEntry {
    pub fn new(id: u64, active: bool) -> Self {
        Self {
            id: id.into(),
            value: active.into(),
        }
    }
}

/// A validated link (move) entry between two timesteps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkEntry {
    pub src: NodeId,
    pub dest: NodeId,
    pub value: Activity,
}

impl LinkEntry {
    pub fn new(src: u64, dest: u64, active: bool) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            value: active.into(),
        }
    }
}

/// How division entries of a document are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionForm {
    /// Legacy form: the division is identified by the parent id alone
    ById,
    /// Explicit form: parent plus both children
    ByParentChildren,
}

impl DivisionForm {
    /// Decide the keying form for a whole document
    ///
    /// The explicit form is used unless an active entry lacks `parent` or
    /// `children`; the first such entry switches the entire document to
    /// id keying. Inactive entries never influence the decision. An empty
    /// sequence is treated as explicit, which yields the same empty set.
    pub fn detect(entries: &[RawDivisionEntry]) -> DivisionForm {
        let fallback = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_active())
            .find(|(_, entry)| !entry.has_explicit_fields());

        match fallback {
            Some((index, _)) => {
                log::debug!(
                    "Division entry {} has no explicit children, keying all divisions by id",
                    index
                );
                DivisionForm::ById
            }
            None => DivisionForm::ByParentChildren,
        }
    }
}

/// A validated division entry
///
/// Only active entries are keyed, so inactive ones keep nothing but their
/// value and are accepted whichever form they were written in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DivisionEntry {
    ById {
        id: NodeId,
        value: Activity,
    },
    ByParentChildren {
        parent: NodeId,
        children: [NodeId; 2],
        value: Activity,
    },
    Inactive {
        value: Activity,
    },
}

impl DivisionEntry {
    pub fn value(&self) -> Activity {
        match *self {
            DivisionEntry::ById { value, .. } => value,
            DivisionEntry::ByParentChildren { value, .. } => value,
            DivisionEntry::Inactive { value } => value,
        }
    }

    /// Form of an active entry; `None` for inactive ones
    pub fn form(&self) -> Option<DivisionForm> {
        match self {
            DivisionEntry::ById { .. } => Some(DivisionForm::ById),
            DivisionEntry::ByParentChildren { .. } => Some(DivisionForm::ByParentChildren),
            DivisionEntry::Inactive { .. } => None,
        }
    }

    fn from_raw(raw: &RawDivisionEntry, form: DivisionForm, index: usize) -> Result<Self> {
        let value = raw.value.ok_or_else(|| {
            ScoreError::malformed(DIVISION_RESULTS, index, "missing field `value`")
        })?;

        if !value.is_active() {
            return Ok(DivisionEntry::Inactive { value });
        }

        match form {
            DivisionForm::ById => {
                let id = raw.id.ok_or_else(|| {
                    ScoreError::malformed(DIVISION_RESULTS, index, "missing field `id`")
                })?;
                Ok(DivisionEntry::ById { id, value })
            }
            DivisionForm::ByParentChildren => {
                let parent = raw.parent.ok_or_else(|| {
                    ScoreError::malformed(DIVISION_RESULTS, index, "missing field `parent`")
                })?;
                let children = match raw.children.as_deref() {
                    Some(&[first, second]) => [first, second],
                    Some(other) => {
                        return Err(ScoreError::malformed(
                            DIVISION_RESULTS,
                            index,
                            format!("expected exactly two children, found {}", other.len()),
                        ))
                    }
                    None => {
                        return Err(ScoreError::malformed(
                            DIVISION_RESULTS,
                            index,
                            "missing field `children`",
                        ))
                    }
                };
                Ok(DivisionEntry::ByParentChildren {
                    parent,
                    children,
                    value,
                })
            }
        }
    }
}

/// A fully validated result document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument {
    #[serde(rename = "detectionResults")]
    pub detections: Vec<DetectionEntry>,
    #[serde(rename = "linkingResults")]
    pub links: Vec<LinkEntry>,
    #[serde(rename = "divisionResults")]
    pub divisions: Vec<DivisionEntry>,
    #[serde(skip)]
    pub division_form: DivisionForm,
}

impl ResultDocument {
    /// Create a document without divisions
    pub fn new(detections: Vec<DetectionEntry>, links: Vec<LinkEntry>) -> Self {
        Self {
            detections,
            links,
            divisions: Vec::new(),
            division_form: DivisionForm::ByParentChildren,
        }
    }

    /// Builder method: attach division entries
    ///
    /// The form is taken from the first active entry; mixing forms among
    /// active entries is rejected.
    pub fn with_divisions(mut self, divisions: Vec<DivisionEntry>) -> Result<Self> {
        let form = divisions
            .iter()
            .find_map(DivisionEntry::form)
            .unwrap_or(DivisionForm::ByParentChildren);

        for (index, entry) in divisions.iter().enumerate() {
            if entry.form().map_or(false, |entry_form| entry_form != form) {
                return Err(ScoreError::malformed(
                    DIVISION_RESULTS,
                    index,
                    "division entries mix id and parent/children forms",
                ));
            }
        }

        self.divisions = divisions;
        self.division_form = form;
        Ok(self)
    }

    /// Parse and validate a document from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawResultDocument = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Validate an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawResultDocument = serde_json::from_value(value)?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawResultDocument> for ResultDocument {
    type Error = ScoreError;

    fn try_from(raw: RawResultDocument) -> Result<Self> {
        let raw_detections = raw.detection_results.ok_or_else(|| {
            ScoreError::InvalidDocument(format!("missing sequence `{}`", DETECTION_RESULTS))
        })?;
        let raw_links = raw.linking_results.ok_or_else(|| {
            ScoreError::InvalidDocument(format!("missing sequence `{}`", LINKING_RESULTS))
        })?;
        let raw_divisions = raw.division_results.unwrap_or_default();

        let detections = raw_detections
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<DetectionEntry> {
                let id = entry.id.ok_or_else(|| {
                    ScoreError::malformed(DETECTION_RESULTS, index, "missing field `id`")
                })?;
                let value = entry.value.ok_or_else(|| {
                    ScoreError::malformed(DETECTION_RESULTS, index, "missing field `value`")
                })?;
                Ok(DetectionEntry { id, value })
            })
            .collect::<Result<Vec<_>>>()?;

        let links = raw_links
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<LinkEntry> {
                let src = entry.src.ok_or_else(|| {
                    ScoreError::malformed(LINKING_RESULTS, index, "missing field `src`")
                })?;
                let dest = entry.dest.ok_or_else(|| {
                    ScoreError::malformed(LINKING_RESULTS, index, "missing field `dest`")
                })?;
                let value = entry.value.ok_or_else(|| {
                    ScoreError::malformed(LINKING_RESULTS, index, "missing field `value`")
                })?;
                Ok(LinkEntry { src, dest, value })
            })
            .collect::<Result<Vec<_>>>()?;

        let division_form = DivisionForm::detect(&raw_divisions);
        let divisions = raw_divisions
            .iter()
            .enumerate()
            .map(|(index, entry)| DivisionEntry::from_raw(entry, division_form, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResultDocument {
            detections,
            links,
            divisions,
            division_form,
        })
    }
}
