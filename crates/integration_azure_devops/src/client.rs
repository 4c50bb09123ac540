//! Azure DevOps work item client
//!
//! HTTP client for the work item tracking REST API.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    ApiErrorBody, JsonPatchOperation, WiqlQuery, WiqlResult, WorkItem, WorkItemExpand,
    WorkItemList,
};

/// Content type required by the work item update endpoint
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Azure DevOps client errors
#[derive(Debug, Error)]
pub enum DevOpsError {
    /// Client configuration is unusable (bad base url...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Connection to the server failed or timed out
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was rejected or could not be sent
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Access token missing, expired, or lacking scope
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Work item (or project) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Server-side failure
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Azure DevOps connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DevOpsConfig {
    /// Server root (default: <https://dev.azure.com>); for on-premises
    /// servers this is the collection url and `organization` stays empty
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Organization name, appended to `base_url`
    #[serde(default)]
    pub organization: String,

    /// Project that scopes WIQL queries (optional)
    #[serde(default)]
    pub project: Option<String>,

    /// Personal access token used for basic authentication
    #[serde(default)]
    pub personal_access_token: String,

    /// REST api-version (default: 7.0)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dev.azure.com".to_string()
}

fn default_api_version() -> String {
    "7.0".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for DevOpsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization: String::new(),
            project: None,
            personal_access_token: String::new(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for DevOpsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevOpsConfig")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("personal_access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DevOpsConfig {
    /// Organization (or collection) url all endpoints hang off
    #[must_use]
    pub fn organization_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let org = self.organization.trim_matches('/');
        if org.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{org}")
        }
    }
}

/// Work item tracking client trait
#[async_trait]
pub trait DevOpsClient: Send + Sync {
    /// Run a WIQL query
    async fn query_by_wiql(&self, query: &str) -> Result<WiqlResult, DevOpsError>;

    /// Fetch several work items with selected fields
    async fn get_work_items(
        &self,
        ids: &[i64],
        fields: &[&str],
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<WorkItem>, DevOpsError>;

    /// Fetch one work item
    async fn get_work_item(&self, id: i64, expand: WorkItemExpand)
    -> Result<WorkItem, DevOpsError>;

    /// Apply a JSON-Patch document to a work item
    async fn update_work_item(
        &self,
        id: i64,
        document: &[JsonPatchOperation],
    ) -> Result<WorkItem, DevOpsError>;

    /// Check that the server is reachable and the token is accepted
    async fn is_healthy(&self) -> bool;
}

/// Azure DevOps REST client implementation
#[derive(Debug)]
pub struct AzureDevOpsClient {
    client: Client,
    config: DevOpsConfig,
}

impl AzureDevOpsClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized or the
    /// organization url is not a valid absolute url.
    pub fn new(config: DevOpsConfig) -> Result<Self, DevOpsError> {
        Url::parse(&config.organization_url())
            .map_err(|e| DevOpsError::InvalidConfig(format!("{}: {e}", config.organization_url())))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DevOpsError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &DevOpsConfig {
        &self.config
    }

    /// Build an endpoint url below `{organization}[/{project}]/_apis/`
    fn endpoint(&self, project_scoped: bool, segments: &[&str]) -> Result<Url, DevOpsError> {
        let mut url = Url::parse(&self.config.organization_url())
            .map_err(|e| DevOpsError::InvalidConfig(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| DevOpsError::InvalidConfig("base url cannot carry a path".into()))?;
            path.pop_if_empty();
            if project_scoped {
                if let Some(project) = self.config.project.as_deref().filter(|p| !p.is_empty()) {
                    path.push(project);
                }
            }
            path.push("_apis");
            path.extend(segments);
        }
        Ok(url)
    }

    /// Attach authentication and the api-version parameter
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth("", Some(&self.config.personal_access_token))
            .query(&[("api-version", self.config.api_version.as_str())])
    }

    /// Send a request and decode the JSON body, mapping HTTP failures
    async fn execute<T: DeserializeOwned>(
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, DevOpsError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DevOpsError::ConnectionFailed(e.to_string())
            } else {
                DevOpsError::RequestFailed(e.to_string())
            }
        })?;

        let response = Self::check_status(response, resource).await?;

        response
            .json()
            .await
            .map_err(|e| DevOpsError::ParseError(e.to_string()))
    }

    /// Map non-success statuses to errors, keeping the server's message
    async fn check_status(response: Response, resource: &str) -> Result<Response, DevOpsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DevOpsError::Unauthorized(message),
            StatusCode::NOT_FOUND => DevOpsError::NotFound(format!("{resource}: {message}")),
            StatusCode::TOO_MANY_REQUESTS => DevOpsError::RateLimitExceeded,
            s if s.is_server_error() => DevOpsError::ServiceUnavailable(message),
            _ => DevOpsError::RequestFailed(message),
        })
    }

    fn format_as_of(as_of: DateTime<Utc>) -> String {
        as_of.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[async_trait]
impl DevOpsClient for AzureDevOpsClient {
    #[instrument(skip(self, query))]
    async fn query_by_wiql(&self, query: &str) -> Result<WiqlResult, DevOpsError> {
        let url = self.endpoint(true, &["wit", "wiql"])?;
        debug!(url = %url, "Running WIQL query");

        let body = WiqlQuery {
            query: query.to_string(),
        };
        let request = self.authorize(self.client.post(url)).json(&body);
        Self::execute(request, "wiql").await
    }

    #[instrument(skip(self, ids, fields), fields(count = ids.len()))]
    async fn get_work_items(
        &self,
        ids: &[i64],
        fields: &[&str],
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<WorkItem>, DevOpsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(false, &["wit", "workitems"])?;
        let ids_param = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut params = vec![("ids", ids_param)];
        if !fields.is_empty() {
            params.push(("fields", fields.join(",")));
        }
        if let Some(at) = as_of {
            params.push(("asOf", Self::format_as_of(at)));
        }

        debug!(url = %url, "Fetching work item batch");
        let request = self.authorize(self.client.get(url)).query(&params);
        let list: WorkItemList = Self::execute(request, "work items").await?;
        Ok(list.value)
    }

    #[instrument(skip(self))]
    async fn get_work_item(
        &self,
        id: i64,
        expand: WorkItemExpand,
    ) -> Result<WorkItem, DevOpsError> {
        let id_segment = id.to_string();
        let url = self.endpoint(false, &["wit", "workitems", &id_segment])?;
        debug!(url = %url, "Fetching work item");

        let mut request = self.authorize(self.client.get(url));
        if let Some(expand) = expand.as_query() {
            request = request.query(&[("$expand", expand)]);
        }
        Self::execute(request, &format!("work item {id}")).await
    }

    #[instrument(skip(self, document), fields(ops = document.len()))]
    async fn update_work_item(
        &self,
        id: i64,
        document: &[JsonPatchOperation],
    ) -> Result<WorkItem, DevOpsError> {
        let id_segment = id.to_string();
        let url = self.endpoint(false, &["wit", "workitems", &id_segment])?;
        debug!(url = %url, "Patching work item");

        let body =
            serde_json::to_vec(document).map_err(|e| DevOpsError::ParseError(e.to_string()))?;
        let request = self
            .authorize(self.client.patch(url))
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body);
        Self::execute(request, &format!("work item {id}")).await
    }

    async fn is_healthy(&self) -> bool {
        let Ok(url) = self.endpoint(false, &["projects"]) else {
            return false;
        };
        let request = self
            .authorize(self.client.get(url))
            .query(&[("$top", "1")]);
        Self::execute::<serde_json::Value>(request, "projects")
            .await
            .is_ok()
    }
}
