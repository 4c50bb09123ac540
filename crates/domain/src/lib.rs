//! Domain layer for WorkTree
//!
//! Contains the work item entity, its hierarchy classification rules,
//! value objects, and domain errors. Pure logic only: no I/O happens here.

pub mod entities;
pub mod errors;
pub mod hierarchy;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use hierarchy::HierarchyMap;
pub use value_objects::*;
