//! Work item tracker port
//!
//! Defines the interface to the external issue-tracking backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{PatchOperation, Relation, WorkItemId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a tracker query: matching ids and the snapshot time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Ids of the matching work items, in query order
    pub ids: Vec<WorkItemId>,
    /// Point in time the query was evaluated at
    pub as_of: Option<DateTime<Utc>>,
}

/// A work item as returned by the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteWorkItem {
    /// Work item id
    pub id: WorkItemId,
    /// Revision number of the current state
    pub revision: u32,
    /// `System.Title`, when requested and present
    pub title: Option<String>,
    /// `System.State`, when requested and present
    pub state: Option<String>,
    /// Relations; empty unless fetched with relations
    pub relations: Vec<Relation>,
}

impl RemoteWorkItem {
    /// Whether the item has at least one parent link
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.relations.iter().any(Relation::is_parent)
    }

    /// Ids of the item's children
    pub fn child_ids(&self) -> Result<Vec<WorkItemId>, ApplicationError> {
        self.relations
            .iter()
            .filter(|r| r.is_child())
            .map(|r| r.target_id().map_err(ApplicationError::from))
            .collect()
    }
}

/// Port for work item tracker operations
///
/// Every call is a single remote request; implementations do not cache.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkItemTrackerPort: Send + Sync {
    /// Run a WIQL query and return the matching ids
    async fn query_ids(&self, wiql: &str) -> Result<QueryResult, ApplicationError>;

    /// Fetch id, title and state for a batch of work items
    ///
    /// # Arguments
    /// * `ids` - Work items to fetch (at most 200 per call)
    /// * `as_of` - Snapshot time, usually the one returned by the query
    async fn get_work_items(
        &self,
        ids: &[WorkItemId],
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteWorkItem>, ApplicationError>;

    /// Fetch a single work item, optionally including its relations
    async fn get_work_item(
        &self,
        id: WorkItemId,
        with_relations: bool,
    ) -> Result<RemoteWorkItem, ApplicationError>;

    /// Apply JSON-Patch operations to a work item and return its new state
    async fn update_work_item(
        &self,
        id: WorkItemId,
        operations: &[PatchOperation],
    ) -> Result<RemoteWorkItem, ApplicationError>;

    /// Check if the tracker is reachable with the configured credentials
    async fn is_healthy(&self) -> bool;
}
