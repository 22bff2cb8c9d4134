//! Annex-A control entity

use super::status::{Category, ConformityStatus};
use super::value_objects::{ControlCode, ControlId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single Annex-A requirement instance being tracked
///
/// `id`, `code` and `category` never change after creation. `status`,
/// `comment` and `evidence_ref` change only through an explicit evaluation,
/// which also refreshes `last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: ControlId,
    pub code: ControlCode,
    pub title: String,
    /// Requirement text
    pub description: String,
    pub category: Category,
    pub status: ConformityStatus,
    pub comment: Option<String>,
    pub evidence_ref: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Control {
    /// Apply an evaluation in place
    pub fn apply_evaluation(&mut self, evaluation: &Evaluation, at: DateTime<Utc>) {
        self.status = evaluation.status;
        self.comment = evaluation.comment.clone();
        self.evidence_ref = evaluation.evidence_ref.clone();
        self.last_updated = at;
    }
}

/// Control awaiting insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewControl {
    pub code: ControlCode,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: ConformityStatus,
}

impl NewControl {
    /// New control in the default (non conforming) state
    pub fn new(code: ControlCode, title: impl Into<String>, category: Category) -> Self {
        Self {
            code,
            title: title.into(),
            description: String::new(),
            category,
            status: ConformityStatus::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the initial status
    pub fn with_status(mut self, status: ConformityStatus) -> Self {
        self.status = status;
        self
    }

    /// Materialise with a store-assigned id
    pub fn into_control(self, id: ControlId, at: DateTime<Utc>) -> Control {
        Control {
            id,
            code: self.code,
            title: self.title,
            description: self.description,
            category: self.category,
            status: self.status,
            comment: None,
            evidence_ref: None,
            last_updated: at,
        }
    }
}

/// Typed evaluation of one control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: ConformityStatus,
    pub comment: Option<String>,
    pub evidence_ref: Option<String>,
}

impl Evaluation {
    /// Evaluation with only a status
    pub fn new(status: ConformityStatus) -> Self {
        Self {
            status,
            comment: None,
            evidence_ref: None,
        }
    }

    /// Attach a comment; blank text counts as none
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.trim().is_empty());
        self
    }

    /// Attach an evidence reference; blank text counts as none
    pub fn with_evidence(mut self, evidence_ref: Option<String>) -> Self {
        self.evidence_ref = evidence_ref.filter(|e| !e.trim().is_empty());
        self
    }
}
