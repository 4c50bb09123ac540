//! Azure DevOps connection configuration.

use application::DEFAULT_QUERY;
use integration_azure_devops::DevOpsConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Azure DevOps configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevOpsAppConfig {
    /// Server root (default: https://dev.azure.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Organization name; empty for on-premises collection urls
    #[serde(default)]
    pub organization: String,

    /// Project that scopes WIQL queries
    #[serde(default)]
    pub project: Option<String>,

    /// Personal access token
    #[serde(default = "empty_secret", skip_serializing)]
    pub personal_access_token: SecretString,

    /// REST api-version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// WIQL query selecting the work items to show
    #[serde(default = "default_wiql")]
    pub wiql: String,
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

fn default_wiql() -> String {
    DEFAULT_QUERY.to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Default for DevOpsAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization: String::new(),
            project: None,
            personal_access_token: empty_secret(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
            wiql: default_wiql(),
        }
    }
}

impl DevOpsAppConfig {
    /// Whether a token is set and the server can be addressed.
    ///
    /// On-premises servers put the collection into `base_url`, so an empty
    /// organization is only a problem against the cloud default.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.has_token() && self.is_addressable()
    }

    /// Whether a personal access token is set
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.personal_access_token.expose_secret().trim().is_empty()
    }

    /// Whether the organization url points somewhere usable
    #[must_use]
    pub fn is_addressable(&self) -> bool {
        !self.organization.trim().is_empty() || self.base_url != default_base_url()
    }

    /// Convert to the client configuration
    #[must_use]
    pub fn to_client_config(&self) -> DevOpsConfig {
        DevOpsConfig {
            base_url: self.base_url.clone(),
            organization: self.organization.clone(),
            project: self.project.clone().filter(|p| !p.trim().is_empty()),
            personal_access_token: self.personal_access_token.expose_secret().to_string(),
            api_version: self.api_version.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
