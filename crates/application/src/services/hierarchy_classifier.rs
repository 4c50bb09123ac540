//! Hierarchy classifier
//!
//! Derives the Epic / Issue / Task level of each work item in a batch from
//! its hierarchy links. Runs in two scans over the batch, each issuing one
//! tracker read per item, then assigns levels from the scan results.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::{HierarchyMap, WorkItem, WorkItemId};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::WorkItemTrackerPort};

/// Items of a batch that have no parent link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootScan {
    /// Root ids, in batch order
    pub roots: Vec<WorkItemId>,
}

/// Children of each item of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildScan {
    /// Child ids per item; items without children are absent
    pub children: HashMap<WorkItemId, Vec<WorkItemId>>,
}

/// Classifies work items into hierarchy levels
pub struct HierarchyClassifier {
    tracker: Arc<dyn WorkItemTrackerPort>,
}

impl fmt::Debug for HierarchyClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyClassifier").finish_non_exhaustive()
    }
}

impl HierarchyClassifier {
    /// Create a new classifier
    pub fn new(tracker: Arc<dyn WorkItemTrackerPort>) -> Self {
        Self { tracker }
    }

    /// Classify every item of the batch
    ///
    /// Any tracker failure aborts the whole batch; no partial result is
    /// returned. Output order matches input order.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn classify(&self, mut items: Vec<WorkItem>) -> Result<Vec<WorkItem>, ApplicationError> {
        if items.is_empty() {
            return Ok(items);
        }

        let batch: Vec<WorkItemId> = items.iter().map(|item| item.id).collect();

        let roots = self.scan_roots(&batch).await?;
        let children = self.scan_children(&batch).await?;

        let levels = HierarchyMap::assign(&batch, &roots.roots, &children.children);
        levels.apply(&mut items);

        info!(
            total = items.len(),
            classified = levels.len(),
            "Classified work items"
        );
        Ok(items)
    }

    /// First scan: find the items without a parent link
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub async fn scan_roots(&self, batch: &[WorkItemId]) -> Result<RootScan, ApplicationError> {
        let mut roots = Vec::new();
        for id in batch {
            let remote = self.tracker.get_work_item(*id, true).await?;
            if !remote.has_parent() {
                debug!(id = %id, "No parent link");
                roots.push(*id);
            }
        }
        Ok(RootScan { roots })
    }

    /// Second scan: collect the children of every item
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub async fn scan_children(&self, batch: &[WorkItemId]) -> Result<ChildScan, ApplicationError> {
        let mut children = HashMap::new();
        for id in batch {
            let remote = self.tracker.get_work_item(*id, true).await?;
            let kids = remote.child_ids()?;
            if !kids.is_empty() {
                debug!(id = %id, children = kids.len(), "Found child links");
                children.insert(*id, kids);
            }
        }
        Ok(ChildScan { children })
    }
}
