//! Hierarchy level value object
//!
//! Position of a work item in the Epic / Issue / Task tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level a work item occupies in the derived hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HierarchyLevel {
    /// Top-level item with no parent
    Epic,
    /// Direct child of an epic
    Issue,
    /// Direct child of an issue
    Task,
}

impl HierarchyLevel {
    /// Human-readable label, also the value carried on the wire
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Epic => "Epic",
            Self::Issue => "Issue",
            Self::Task => "Task",
        }
    }

    /// Level assigned to the direct children of an item at this level
    ///
    /// Only two child levels exist, so children of a task stay unclassified.
    #[must_use]
    pub const fn child_level(&self) -> Option<Self> {
        match self {
            Self::Epic => Some(Self::Issue),
            Self::Issue => Some(Self::Task),
            Self::Task => None,
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for HierarchyLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epic" => Ok(Self::Epic),
            "issue" => Ok(Self::Issue),
            "task" => Ok(Self::Task),
            _ => Err("Invalid hierarchy level"),
        }
    }
}
