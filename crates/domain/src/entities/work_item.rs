//! Work item entity
//!
//! A trackable unit (bug, task, issue, epic) as seen by this service: the
//! backend-assigned id, its title, and the hierarchy level derived for it.
//! Instances are rebuilt on every request; nothing is persisted locally.

use serde::{Deserialize, Serialize};

use crate::value_objects::{HierarchyLevel, WorkItemId};

/// A work item with its derived hierarchy level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Backend-assigned identifier
    pub id: WorkItemId,
    /// Free-text title
    pub title: String,
    /// Derived level; `None` until classified or when no level applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<HierarchyLevel>,
}

impl WorkItem {
    /// Create an unclassified work item
    pub fn new(id: WorkItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            level: None,
        }
    }

    /// Set the hierarchy level
    #[must_use]
    pub fn with_level(mut self, level: HierarchyLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Whether a hierarchy level has been assigned
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        self.level.is_some()
    }

    /// Whether this item is a top-level epic
    #[must_use]
    pub fn is_epic(&self) -> bool {
        self.level == Some(HierarchyLevel::Epic)
    }
}
