//! Hierarchy level assignment
//!
//! Turns the results of the two relation scans (which items have no parent,
//! and which children each item has) into a level per work item. Levels are
//! assigned breadth-first from the roots, so the outcome does not depend on
//! the order in which items were scanned.

use std::collections::{HashMap, HashSet};

use crate::{
    entities::WorkItem,
    value_objects::{HierarchyLevel, WorkItemId},
};

/// Level assigned to each classified work item of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyMap {
    levels: HashMap<WorkItemId, HierarchyLevel>,
}

impl HierarchyMap {
    /// Assign levels to the items of a batch
    ///
    /// * `batch` - ids of every item being classified
    /// * `roots` - ids of the items that have no parent relation
    /// * `children` - child ids per item, as reported by forward relations
    ///
    /// Roots become epics, children of epics become issues, children of
    /// issues become tasks. The first level an item receives is kept.
    /// Children outside the batch and descendants below the task level are
    /// left unclassified.
    pub fn assign(
        batch: &[WorkItemId],
        roots: &[WorkItemId],
        children: &HashMap<WorkItemId, Vec<WorkItemId>>,
    ) -> Self {
        let in_batch: HashSet<WorkItemId> = batch.iter().copied().collect();
        let mut levels = HashMap::with_capacity(batch.len());

        let mut frontier: Vec<WorkItemId> = Vec::new();
        for root in roots.iter().filter(|id| in_batch.contains(id)) {
            if levels.insert(*root, HierarchyLevel::Epic).is_none() {
                frontier.push(*root);
            }
        }

        let mut level = HierarchyLevel::Epic;
        while let Some(child_level) = level.child_level() {
            let mut next = Vec::new();
            for parent in &frontier {
                let Some(kids) = children.get(parent) else {
                    continue;
                };
                for child in kids.iter().filter(|id| in_batch.contains(id)) {
                    if !levels.contains_key(child) {
                        levels.insert(*child, child_level);
                        next.push(*child);
                    }
                }
            }
            frontier = next;
            level = child_level;
        }

        Self { levels }
    }

    /// Level assigned to an item, if any
    #[must_use]
    pub fn level_of(&self, id: WorkItemId) -> Option<HierarchyLevel> {
        self.levels.get(&id).copied()
    }

    /// Number of classified items
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no item was classified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Write the assigned levels onto the given items
    ///
    /// Items without an assigned level are reset to unclassified.
    pub fn apply(&self, items: &mut [WorkItem]) {
        for item in items {
            item.level = self.level_of(item.id);
        }
    }
}
