//! Port definitions (interfaces for external systems)

mod work_item_tracker_port;

#[cfg(test)]
pub use work_item_tracker_port::MockWorkItemTrackerPort;
pub use work_item_tracker_port::{QueryResult, RemoteWorkItem, WorkItemTrackerPort};
