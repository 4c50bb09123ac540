//! Azure DevOps adapter - Implements WorkItemTrackerPort using integration_azure_devops

use application::error::ApplicationError;
use application::ports::{QueryResult, RemoteWorkItem, WorkItemTrackerPort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{PatchOp, PatchOperation, Relation, WorkItemId};
use integration_azure_devops::{
    AzureDevOpsClient, DevOpsClient, DevOpsError, JsonPatchOperation, Operation,
    WorkItem as IntegrationWorkItem, WorkItemExpand, fields,
};
use tracing::{debug, instrument, warn};

use crate::config::DevOpsAppConfig;

/// Fields requested for batch reads
const LIST_FIELDS: [&str; 3] = [fields::ID, fields::TITLE, fields::STATE];

/// Adapter for the Azure DevOps work item tracking API
pub struct AzureDevOpsAdapter {
    client: AzureDevOpsClient,
}

impl std::fmt::Debug for AzureDevOpsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsAdapter")
            .field("organization_url", &self.client.config().organization_url())
            .field("project", &self.client.config().project)
            .finish_non_exhaustive()
    }
}

impl AzureDevOpsAdapter {
    /// Create an adapter from application configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base url is invalid or the HTTP client fails
    /// to initialize.
    pub fn new(config: &DevOpsAppConfig) -> Result<Self, ApplicationError> {
        let client =
            AzureDevOpsClient::new(config.to_client_config()).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn with_client(client: AzureDevOpsClient) -> Self {
        Self { client }
    }

    /// Map integration error to application error
    fn map_error(err: DevOpsError) -> ApplicationError {
        match err {
            DevOpsError::InvalidConfig(e) => ApplicationError::Configuration(e),
            DevOpsError::ConnectionFailed(e)
            | DevOpsError::RequestFailed(e)
            | DevOpsError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            DevOpsError::ParseError(e) => {
                ApplicationError::ExternalService(format!("unexpected response: {e}"))
            },
            DevOpsError::Unauthorized(e) => ApplicationError::NotAuthorized(e),
            DevOpsError::NotFound(e) => ApplicationError::NotFound(e),
            DevOpsError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Convert a wire work item into the port's representation
    fn map_work_item(item: IntegrationWorkItem) -> Result<RemoteWorkItem, ApplicationError> {
        let id = WorkItemId::new(item.id)?;
        let relations = item
            .relations()
            .iter()
            .map(|r| Relation::new(&r.rel, r.url.clone()))
            .collect();

        Ok(RemoteWorkItem {
            id,
            revision: item.rev.unwrap_or_default(),
            title: item.title().map(str::to_string),
            state: item.state().map(str::to_string),
            relations,
        })
    }

    const fn map_op(op: PatchOp) -> Operation {
        match op {
            PatchOp::Add => Operation::Add,
            PatchOp::Replace => Operation::Replace,
            PatchOp::Remove => Operation::Remove,
            PatchOp::Test => Operation::Test,
        }
    }

    fn map_patch(operation: &PatchOperation) -> JsonPatchOperation {
        JsonPatchOperation {
            op: Self::map_op(operation.op),
            path: operation.path.clone(),
            from: None,
            value: operation.value.clone(),
        }
    }
}

#[async_trait]
impl WorkItemTrackerPort for AzureDevOpsAdapter {
    #[instrument(skip(self, wiql))]
    async fn query_ids(&self, wiql: &str) -> Result<QueryResult, ApplicationError> {
        let result = self
            .client
            .query_by_wiql(wiql)
            .await
            .map_err(Self::map_error)?;

        let ids = result
            .ids()
            .into_iter()
            .map(WorkItemId::new)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = ids.len(), "WIQL query returned work items");
        Ok(QueryResult {
            ids,
            as_of: result.as_of,
        })
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_work_items(
        &self,
        ids: &[WorkItemId],
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteWorkItem>, ApplicationError> {
        let raw_ids: Vec<i64> = ids.iter().map(WorkItemId::value).collect();
        let items = self
            .client
            .get_work_items(&raw_ids, &LIST_FIELDS, as_of)
            .await
            .map_err(Self::map_error)?;

        items.into_iter().map(Self::map_work_item).collect()
    }

    #[instrument(skip(self), fields(id = id.value()))]
    async fn get_work_item(
        &self,
        id: WorkItemId,
        with_relations: bool,
    ) -> Result<RemoteWorkItem, ApplicationError> {
        let expand = if with_relations {
            WorkItemExpand::Relations
        } else {
            WorkItemExpand::None
        };

        let item = self
            .client
            .get_work_item(id.value(), expand)
            .await
            .map_err(Self::map_error)?;
        Self::map_work_item(item)
    }

    #[instrument(skip(self, operations), fields(id = id.value(), ops = operations.len()))]
    async fn update_work_item(
        &self,
        id: WorkItemId,
        operations: &[PatchOperation],
    ) -> Result<RemoteWorkItem, ApplicationError> {
        let document: Vec<JsonPatchOperation> = operations.iter().map(Self::map_patch).collect();

        let result = self
            .client
            .update_work_item(id.value(), &document)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(item) => debug!(rev = ?item.rev, "Work item updated"),
            Err(e) => warn!(error = %e, "Work item update failed"),
        }

        result.and_then(Self::map_work_item)
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}
