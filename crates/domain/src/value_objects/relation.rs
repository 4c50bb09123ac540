//! Work item relation value object
//!
//! A link reported by the tracker between one work item and another.
//! Only the hierarchy link types matter for classification.

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::WorkItemId};

/// Relation type of a parent-to-child link
pub const HIERARCHY_FORWARD: &str = "System.LinkTypes.Hierarchy-Forward";

/// Relation type of a child-to-parent link
pub const HIERARCHY_REVERSE: &str = "System.LinkTypes.Hierarchy-Reverse";

/// Kind of relation, derived from the tracker's `rel` string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    /// The related item is a child of this one
    Child,
    /// The related item is the parent of this one
    Parent,
    /// Any other link type (related, attachment, hyperlink...)
    Other(String),
}

impl RelationKind {
    /// Map a tracker `rel` string to a relation kind
    #[must_use]
    pub fn from_rel(rel: &str) -> Self {
        match rel {
            HIERARCHY_FORWARD => Self::Child,
            HIERARCHY_REVERSE => Self::Parent,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A relation from one work item to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Kind of link
    pub kind: RelationKind,
    /// URL of the related resource; for work item links the last path
    /// segment is the related item's id
    pub url: String,
}

impl Relation {
    /// Build a relation from the tracker's raw `rel` and `url`
    pub fn new(rel: &str, url: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::from_rel(rel),
            url: url.into(),
        }
    }

    /// Whether this is a parent-to-child link
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.kind == RelationKind::Child
    }

    /// Whether this is a child-to-parent link
    #[must_use]
    pub fn is_parent(&self) -> bool {
        self.kind == RelationKind::Parent
    }

    /// Id of the related work item, taken from the trailing URL segment
    pub fn target_id(&self) -> Result<WorkItemId, DomainError> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<WorkItemId>().ok())
            .ok_or_else(|| DomainError::InvalidRelation(self.url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://dev.azure.com/contoso/_apis/wit/workItems";

    #[test]
    fn hierarchy_kinds_are_recognised() {
        assert_eq!(RelationKind::from_rel(HIERARCHY_FORWARD), RelationKind::Child);
        assert_eq!(RelationKind::from_rel(HIERARCHY_REVERSE), RelationKind::Parent);
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Related"),
            RelationKind::Other("System.LinkTypes.Related".to_string())
        );
    }

    #[test]
    fn target_id_from_trailing_segment() {
        let rel = Relation::new(HIERARCHY_FORWARD, format!("{BASE}/123"));
        assert!(rel.is_child());
        assert!(!rel.is_parent());
        assert_eq!(rel.target_id().unwrap().value(), 123);
    }

    #[test]
    fn target_id_tolerates_trailing_slash() {
        let rel = Relation::new(HIERARCHY_REVERSE, format!("{BASE}/9/"));
        assert_eq!(rel.target_id().unwrap().value(), 9);
    }

    #[test]
    fn target_id_rejects_non_numeric_segment() {
        let rel = Relation::new("AttachedFile", "https://dev.azure.com/contoso/_apis/wit/attachments/abc");
        assert!(matches!(rel.target_id(), Err(DomainError::InvalidRelation(_))));
    }
}
