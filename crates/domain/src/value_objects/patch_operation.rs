//! JSON-Patch operations sent to the tracker to edit work item fields

use serde::{Deserialize, Serialize};

/// Reference name of the title field
pub const TITLE_FIELD: &str = "System.Title";

/// JSON-Patch operation verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
    Test,
}

/// A single field-level patch instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation verb
    pub op: PatchOp,
    /// JSON pointer to the target, e.g. `/fields/System.Title`
    pub path: String,
    /// New value; absent for `remove`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl PatchOperation {
    /// Replace the value of a work item field
    pub fn replace_field(field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: format!("/fields/{field}"),
            value: Some(value.into()),
        }
    }

    /// Replace the title of a work item
    pub fn replace_title(title: impl Into<String>) -> Self {
        Self::replace_field(TITLE_FIELD, title.into())
    }
}
