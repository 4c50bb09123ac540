//! Azure DevOps work item tracking API models
//!
//! Request and response bodies of the `_apis/wit` endpoints (api-version 7.0).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference names of the system fields this client reads or writes
pub mod fields {
    /// Work item id
    pub const ID: &str = "System.Id";
    /// Work item title
    pub const TITLE: &str = "System.Title";
    /// Workflow state (New, Active, Closed...)
    pub const STATE: &str = "System.State";
}

/// Body of a WIQL query request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiqlQuery {
    /// The WIQL text
    pub query: String,
}

/// Result of a flat WIQL query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResult {
    /// Time the query was evaluated at
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    /// `flat`, `tree` or `oneHop`
    #[serde(default)]
    pub query_type: Option<String>,
    /// Matching work items; only id and url are populated
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

impl WiqlResult {
    /// Ids of the matching work items, in result order
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.work_items.iter().map(|w| w.id).collect()
    }
}

/// Id and url of a work item returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemReference {
    /// Work item id
    pub id: i64,
    /// REST url of the work item
    #[serde(default)]
    pub url: Option<String>,
}

/// A work item resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Work item id
    pub id: i64,
    /// Revision number
    #[serde(default)]
    pub rev: Option<u32>,
    /// Field values keyed by reference name
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Links to other resources; present only when expanded
    #[serde(default)]
    pub relations: Option<Vec<WorkItemRelation>>,
    /// REST url of the work item
    #[serde(default)]
    pub url: Option<String>,
}

impl WorkItem {
    /// String value of a field, if present
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// `System.Title`
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.field_str(fields::TITLE)
    }

    /// `System.State`
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.field_str(fields::STATE)
    }

    /// Relations, or an empty slice when they were not expanded
    #[must_use]
    pub fn relations(&self) -> &[WorkItemRelation] {
        self.relations.as_deref().unwrap_or_default()
    }
}

/// A link from a work item to another resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemRelation {
    /// Link type, e.g. `System.LinkTypes.Hierarchy-Forward`
    pub rel: String,
    /// Url of the linked resource
    pub url: String,
    /// Link attributes (comment, isLocked, name...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// List envelope returned by batch endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemList {
    /// Number of entries
    pub count: usize,
    /// The work items
    pub value: Vec<WorkItem>,
}

/// Which parts of a work item to expand on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkItemExpand {
    /// Fields only
    #[default]
    None,
    /// Fields and relations
    Relations,
    /// Everything, including links
    All,
}

impl WorkItemExpand {
    /// Value of the `$expand` query parameter, if one is needed
    #[must_use]
    pub const fn as_query(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Relations => Some("relations"),
            Self::All => Some("all"),
        }
    }
}

/// JSON-Patch verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// One entry of a JSON-Patch document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    /// Verb
    pub op: Operation,
    /// Target path, e.g. `/fields/System.Title`
    pub path: String,
    /// Source path for `move` and `copy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Value for `add`, `replace` and `test`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Error body returned by the API on failure
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiql_result_parses_api_shape() {
        let json = r#"{
            "queryType": "flat",
            "queryResultType": "workItem",
            "asOf": "2026-03-01T10:15:00.123Z",
            "columns": [{"referenceName": "System.Id", "name": "ID"}],
            "workItems": [
                {"id": 3, "url": "https://dev.azure.com/contoso/_apis/wit/workItems/3"},
                {"id": 1, "url": "https://dev.azure.com/contoso/_apis/wit/workItems/1"}
            ]
        }"#;
        let result: WiqlResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.ids(), vec![3, 1]);
        assert_eq!(result.query_type.as_deref(), Some("flat"));
        assert!(result.as_of.is_some());
    }

    #[test]
    fn work_item_exposes_fields_and_relations() {
        let json = r#"{
            "id": 2,
            "rev": 7,
            "fields": {"System.Title": "Login page", "System.State": "Active"},
            "relations": [
                {"rel": "System.LinkTypes.Hierarchy-Reverse",
                 "url": "https://dev.azure.com/contoso/_apis/wit/workItems/1",
                 "attributes": {"isLocked": false, "name": "Parent"}}
            ],
            "url": "https://dev.azure.com/contoso/_apis/wit/workItems/2"
        }"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.rev, Some(7));
        assert_eq!(item.title(), Some("Login page"));
        assert_eq!(item.state(), Some("Active"));
        assert_eq!(item.relations().len(), 1);
        assert_eq!(item.relations()[0].rel, "System.LinkTypes.Hierarchy-Reverse");
    }

    #[test]
    fn work_item_without_relations() {
        let item: WorkItem = serde_json::from_str(r#"{"id": 5, "fields": {}}"#).unwrap();
        assert!(item.relations().is_empty());
        assert!(item.title().is_none());
    }

    #[test]
    fn patch_operation_serialization() {
        let op = JsonPatchOperation {
            op: Operation::Replace,
            path: "/fields/System.Title".to_string(),
            from: None,
            value: Some(Value::String("New".to_string())),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "replace", "path": "/fields/System.Title", "value": "New"})
        );
    }

    #[test]
    fn expand_query_values() {
        assert_eq!(WorkItemExpand::None.as_query(), None);
        assert_eq!(WorkItemExpand::Relations.as_query(), Some("relations"));
        assert_eq!(WorkItemExpand::All.as_query(), Some("all"));
    }
}
