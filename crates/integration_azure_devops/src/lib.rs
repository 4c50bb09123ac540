//! Azure DevOps work item tracking integration
//!
//! Client for the Azure DevOps (and Team Foundation Server) work item REST
//! API: WIQL queries, work item reads with relations, and JSON-Patch updates.
//! Authenticates with a personal access token.

pub mod client;
mod models;

pub use client::{AzureDevOpsClient, DevOpsClient, DevOpsConfig, DevOpsError};
pub use models::{
    JsonPatchOperation, Operation, WiqlQuery, WiqlResult, WorkItem, WorkItemExpand,
    WorkItemList, WorkItemReference, WorkItemRelation, fields,
};
