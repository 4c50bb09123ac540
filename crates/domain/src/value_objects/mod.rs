//! Value Objects - Immutable, identity-less domain primitives

mod hierarchy_level;
mod patch_operation;
mod relation;
mod work_item_id;

pub use hierarchy_level::HierarchyLevel;
pub use patch_operation::{PatchOp, PatchOperation, TITLE_FIELD};
pub use relation::{HIERARCHY_FORWARD, HIERARCHY_REVERSE, Relation, RelationKind};
pub use work_item_id::WorkItemId;
