//! Entities - Domain objects with identity

mod work_item;

pub use work_item::WorkItem;
