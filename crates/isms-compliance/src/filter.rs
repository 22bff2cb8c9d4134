//! Control listing filter

use isms_common::{Category, ConformityStatus, Control};
use serde::{Deserialize, Serialize};

/// Narrow a control listing by category, status and free text
///
/// Every criterion left empty matches everything. The text search is
/// case-insensitive over code, title, description and comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFilter {
    pub category: Option<Category>,
    pub status: Option<ConformityStatus>,
    pub search: Option<String>,
}

impl ControlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: ConformityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none() && self.search.is_none()
    }

    pub fn matches(&self, control: &Control) -> bool {
        if let Some(category) = self.category {
            if control.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if control.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            let hit = control.code.as_str().to_lowercase().contains(&needle)
                || control.title.to_lowercase().contains(&needle)
                || control.description.to_lowercase().contains(&needle)
                || control
                    .comment
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Keep matching controls, preserving order
    pub fn apply(&self, controls: Vec<Control>) -> Vec<Control> {
        if self.is_empty() {
            return controls;
        }
        controls.into_iter().filter(|c| self.matches(c)).collect()
    }
}
