//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod azure_devops_adapter;

pub use azure_devops_adapter::AzureDevOpsAdapter;
