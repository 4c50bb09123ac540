//! Application services - Use case implementations

mod hierarchy_classifier;
mod work_item_service;
mod work_item_updater;

pub use hierarchy_classifier::{ChildScan, HierarchyClassifier, RootScan};
pub use work_item_service::{DEFAULT_QUERY, MAX_ITEMS_PER_FETCH, WorkItemService};
pub use work_item_updater::{ItemOutcome, ItemUpdateResult, UpdateReport, WorkItemUpdater};
