//! Work item updater
//!
//! Pushes edited titles back to the tracker, one item at a time, and reports
//! the outcome of every item so a partially applied batch is visible.

use std::{fmt, sync::Arc};

use domain::{PatchOperation, WorkItem, WorkItemId};
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::WorkItemTrackerPort};

/// Outcome of pushing one item's edit
#[derive(Debug)]
pub enum ItemOutcome {
    /// The patch was applied; carries the item's new revision
    Updated { revision: u32 },
    /// Fetching the item or applying the patch failed
    Failed(ApplicationError),
    /// Not attempted because an earlier item failed
    Skipped,
}

impl ItemOutcome {
    /// Whether the edit was applied
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Outcome for a single work item of a batch
#[derive(Debug)]
pub struct ItemUpdateResult {
    /// Item the outcome belongs to
    pub id: WorkItemId,
    /// What happened
    pub outcome: ItemOutcome,
}

/// Per-item outcomes of a batch update, in input order
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// One entry per input item
    pub results: Vec<ItemUpdateResult>,
}

impl UpdateReport {
    /// True when every item was updated (and for an empty batch)
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_updated())
    }

    /// Number of items whose edit was applied
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_updated()).count()
    }

    /// The item that stopped the batch, if any
    #[must_use]
    pub fn failure(&self) -> Option<&ItemUpdateResult> {
        self.results
            .iter()
            .find(|r| matches!(r.outcome, ItemOutcome::Failed(_)))
    }

    /// Collapse the report into the number of updated items, or the error
    /// that stopped the batch
    pub fn into_result(self) -> Result<usize, ApplicationError> {
        let mut updated = 0;
        for result in self.results {
            match result.outcome {
                ItemOutcome::Updated { .. } => updated += 1,
                ItemOutcome::Failed(err) => return Err(err),
                ItemOutcome::Skipped => {},
            }
        }
        Ok(updated)
    }
}

/// Updates work item titles in the tracker
pub struct WorkItemUpdater {
    tracker: Arc<dyn WorkItemTrackerPort>,
}

impl fmt::Debug for WorkItemUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItemUpdater").finish_non_exhaustive()
    }
}

impl WorkItemUpdater {
    /// Create a new updater
    pub fn new(tracker: Arc<dyn WorkItemTrackerPort>) -> Self {
        Self { tracker }
    }

    /// Push the title of every item to the tracker
    ///
    /// Items are processed in order. The first failure stops the batch: the
    /// failing item is reported as `Failed` and every later item as
    /// `Skipped`. Edits already applied are not rolled back.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn update(&self, items: Vec<WorkItem>) -> UpdateReport {
        let mut results = Vec::with_capacity(items.len());
        let mut stopped = false;

        for item in items {
            if stopped {
                results.push(ItemUpdateResult {
                    id: item.id,
                    outcome: ItemOutcome::Skipped,
                });
                continue;
            }

            let outcome = match self.update_title(&item).await {
                Ok(revision) => ItemOutcome::Updated { revision },
                Err(err) => {
                    warn!(id = %item.id, error = %err, "Failed to update work item");
                    stopped = true;
                    ItemOutcome::Failed(err)
                },
            };
            results.push(ItemUpdateResult {
                id: item.id,
                outcome,
            });
        }

        let report = UpdateReport { results };
        info!(
            updated = report.updated_count(),
            total = report.results.len(),
            "Work item update finished"
        );
        report
    }

    /// Fetch the item, then patch its title; returns the new revision
    async fn update_title(&self, item: &WorkItem) -> Result<u32, ApplicationError> {
        let current = self.tracker.get_work_item(item.id, false).await?;
        debug!(id = %item.id, revision = current.revision, "Current state fetched");

        let patch = [PatchOperation::replace_title(item.title.clone())];
        let updated = self.tracker.update_work_item(item.id, &patch).await?;

        debug!(id = %item.id, revision = updated.revision, "Title updated");
        Ok(updated.revision)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::PatchOp;

    use super::*;
    use crate::ports::{MockWorkItemTrackerPort, RemoteWorkItem};

    fn id(raw: i64) -> WorkItemId {
        WorkItemId::new(raw).unwrap()
    }

    fn remote(id: WorkItemId, revision: u32) -> RemoteWorkItem {
        RemoteWorkItem {
            id,
            revision,
            title: Some("old".to_string()),
            state: None,
            relations: Vec::new(),
        }
    }

    fn tracker_fetching_anything() -> MockWorkItemTrackerPort {
        let mut mock = MockWorkItemTrackerPort::new();
        mock.expect_get_work_item()
            .withf(|_, with_relations| !*with_relations)
            .returning(|id, _| Ok(remote(id, 3)));
        mock
    }

    #[tokio::test]
    async fn one_single_op_patch_per_item() {
        let patches: Arc<Mutex<Vec<(WorkItemId, Vec<PatchOperation>)>>> = Arc::default();
        let seen = Arc::clone(&patches);

        let mut tracker = tracker_fetching_anything();
        tracker
            .expect_update_work_item()
            .times(2)
            .returning(move |id, ops| {
                seen.lock().unwrap().push((id, ops.to_vec()));
                Ok(remote(id, 4))
            });
        let updater = WorkItemUpdater::new(Arc::new(tracker));

        let report = updater
            .update(vec![WorkItem::new(id(1), "First"), WorkItem::new(id(2), "Second")])
            .await;

        assert!(report.all_succeeded());
        assert_eq!(report.updated_count(), 2);

        let patches = patches.lock().unwrap();
        assert_eq!(patches.len(), 2);
        for ((patched_id, ops), (expected_id, title)) in
            patches.iter().zip([(id(1), "First"), (id(2), "Second")])
        {
            assert_eq!(*patched_id, expected_id);
            assert_eq!(ops.len(), 1);
            assert_eq!(ops[0].op, PatchOp::Replace);
            assert_eq!(ops[0].path, "/fields/System.Title");
            assert_eq!(ops[0].value, Some(serde_json::json!(title)));
        }
    }

    #[tokio::test]
    async fn second_patch_failure_is_reported() {
        let mut tracker = tracker_fetching_anything();
        tracker.expect_update_work_item().returning(|id, _| {
            if id.value() == 2 {
                Err(ApplicationError::ExternalService("HTTP 500".into()))
            } else {
                Ok(remote(id, 9))
            }
        });
        let updater = WorkItemUpdater::new(Arc::new(tracker));

        let report = updater
            .update(vec![WorkItem::new(id(1), "A"), WorkItem::new(id(2), "B")])
            .await;

        assert!(!report.all_succeeded());
        assert!(matches!(report.results[0].outcome, ItemOutcome::Updated { revision: 9 }));
        assert!(matches!(report.results[1].outcome, ItemOutcome::Failed(_)));
        assert_eq!(report.failure().map(|r| r.id), Some(id(2)));
        assert!(matches!(
            report.into_result(),
            Err(ApplicationError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn items_after_failure_are_skipped() {
        let mut tracker = MockWorkItemTrackerPort::new();
        tracker.expect_get_work_item().returning(|id, _| {
            if id.value() == 1 {
                Err(ApplicationError::NotFound("1".into()))
            } else {
                Ok(remote(id, 1))
            }
        });
        tracker.expect_update_work_item().never();
        let updater = WorkItemUpdater::new(Arc::new(tracker));

        let report = updater
            .update(vec![WorkItem::new(id(1), "A"), WorkItem::new(id(2), "B")])
            .await;

        assert!(matches!(
            report.results[0].outcome,
            ItemOutcome::Failed(ApplicationError::NotFound(_))
        ));
        assert!(matches!(report.results[1].outcome, ItemOutcome::Skipped));
        assert_eq!(report.updated_count(), 0);
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let mut tracker = MockWorkItemTrackerPort::new();
        tracker.expect_get_work_item().never();
        tracker.expect_update_work_item().never();
        let updater = WorkItemUpdater::new(Arc::new(tracker));

        let report = updater.update(Vec::new()).await;
        assert!(report.all_succeeded());
        assert_eq!(report.into_result().unwrap(), 0);
    }

    #[test]
    fn into_result_counts_updates() {
        let report = UpdateReport {
            results: vec![
                ItemUpdateResult {
                    id: id(1),
                    outcome: ItemOutcome::Updated { revision: 2 },
                },
                ItemUpdateResult {
                    id: id(2),
                    outcome: ItemOutcome::Updated { revision: 5 },
                },
            ],
        };
        assert_eq!(report.into_result().unwrap(), 2);
    }
}
