//! Work item service
//!
//! Entry point used by the HTTP layer: lists work items from the tracker,
//! classifies them, and pushes title edits back.

use std::{fmt, sync::Arc};

use domain::WorkItem;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::WorkItemTrackerPort,
    services::{HierarchyClassifier, UpdateReport, WorkItemUpdater},
};

/// Query used when none is configured: every work item, unfiltered
pub const DEFAULT_QUERY: &str = "SELECT [System.Id], [System.Title] FROM WorkItems";

/// Largest number of ids the tracker accepts in one batch fetch
pub const MAX_ITEMS_PER_FETCH: usize = 200;

/// Service for listing and editing work items
pub struct WorkItemService {
    tracker: Arc<dyn WorkItemTrackerPort>,
    classifier: HierarchyClassifier,
    updater: WorkItemUpdater,
    query: String,
}

impl fmt::Debug for WorkItemService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItemService")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl WorkItemService {
    /// Create a service using the default query
    pub fn new(tracker: Arc<dyn WorkItemTrackerPort>) -> Self {
        Self::with_query(tracker, DEFAULT_QUERY)
    }

    /// Create a service with a custom WIQL query
    pub fn with_query(tracker: Arc<dyn WorkItemTrackerPort>, query: impl Into<String>) -> Self {
        Self {
            classifier: HierarchyClassifier::new(Arc::clone(&tracker)),
            updater: WorkItemUpdater::new(Arc::clone(&tracker)),
            tracker,
            query: query.into(),
        }
    }

    /// The WIQL query this service runs
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run the query and fetch id and title of every match
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<WorkItem>, ApplicationError> {
        let result = self.tracker.query_ids(&self.query).await?;
        info!(count = result.ids.len(), "Query returned work items");

        if result.ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(result.ids.len());
        for chunk in result.ids.chunks(MAX_ITEMS_PER_FETCH) {
            debug!(size = chunk.len(), "Fetching work item batch");
            let remote = self.tracker.get_work_items(chunk, result.as_of).await?;
            items.extend(
                remote
                    .into_iter()
                    .map(|r| WorkItem::new(r.id, r.title.unwrap_or_default())),
            );
        }
        Ok(items)
    }

    /// List every work item with its hierarchy level
    #[instrument(skip(self))]
    pub async fn list_classified(&self) -> Result<Vec<WorkItem>, ApplicationError> {
        let items = self.list_items().await?;
        self.classifier.classify(items).await
    }

    /// Push the titles of the given items to the tracker
    pub async fn update_titles(&self, items: Vec<WorkItem>) -> UpdateReport {
        self.updater.update(items).await
    }

    /// Check whether the tracker is reachable
    pub async fn is_tracker_healthy(&self) -> bool {
        self.tracker.is_healthy().await
    }
}
