//! Application layer - Use cases and orchestration
//!
//! Defines the port to the work item tracker and the services that query,
//! classify, and update work items through it.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
