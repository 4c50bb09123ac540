//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `devops`: Azure DevOps connection and query

mod devops;
mod server;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use devops::DevOpsAppConfig;
pub use server::ServerConfig;

/// Prefix of the environment variables that override file settings
pub const ENV_PREFIX: &str = "WORKTREE";

/// Application environment (development or production)
///
/// Production hides internal error details from API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Azure DevOps settings
    #[serde(default)]
    pub devops: DevOpsAppConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` and the environment
    ///
    /// Environment variables use the `WORKTREE_` prefix and `__` between
    /// nested keys, e.g. `WORKTREE_DEVOPS__ORGANIZATION=contoso`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::defaults()?
            // Optional config file
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Parse configuration from a TOML document on top of the defaults
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.log_format", "text")
    }

    /// Effective environment, development when unset
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Whether the application runs in production
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment() == Environment::Production
    }

    /// Problems worth reporting at startup; none of them are fatal
    #[must_use]
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.devops.is_addressable() {
            warnings.push(
                "devops.organization is not set; the work item tracker is unreachable".to_string(),
            );
        } else if !self.devops.has_token() {
            warnings.push(
                "devops.personal_access_token is not set; requests will be rejected".to_string(),
            );
        }
        if self.is_production() && self.server.allowed_origins.is_empty() {
            warnings.push("server.allowed_origins is empty; CORS allows any origin".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
        assert!(!AppConfig::default().is_production());
    }

    #[test]
    fn environment_display() {
        assert_eq!(format!("{}", Environment::Development), "development");
        assert_eq!(format!("{}", Environment::Production), "production");
    }

    #[test]
    fn environment_from_str() {
        assert_eq!(
            "dev".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, "text");
        assert_eq!(config.devops.base_url, "https://dev.azure.com");
        assert_eq!(config.devops.api_version, "7.0");
        assert_eq!(config.environment(), Environment::Development);
    }

    #[test]
    fn toml_overrides() {
        let config = AppConfig::from_toml(
            r#"
            environment = "production"

            [server]
            port = 8080
            log_format = "json"
            allowed_origins = ["https://boards.contoso.com"]

            [devops]
            organization = "contoso"
            project = "Fabrikam"
            personal_access_token = "secret-pat"
            timeout_secs = 10
            wiql = "SELECT [System.Id] FROM WorkItems WHERE [System.State] <> 'Closed'"
            "#,
        )
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.server.allowed_origins.len(), 1);
        assert_eq!(config.devops.organization, "contoso");
        assert_eq!(config.devops.project.as_deref(), Some("Fabrikam"));
        assert_eq!(config.devops.personal_access_token.expose_secret(), "secret-pat");
        assert_eq!(config.devops.timeout_secs, 10);
        assert!(config.devops.wiql.contains("Closed"));
        assert!(config.startup_warnings().is_empty());
    }

    #[test]
    fn missing_organization_is_a_warning() {
        let config = AppConfig::from_toml("").unwrap();
        let warnings = config.startup_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("organization"));
    }

    #[test]
    fn missing_token_is_a_warning() {
        let config = AppConfig::from_toml("[devops]\norganization = \"contoso\"").unwrap();
        let warnings = config.startup_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("personal_access_token"));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let config =
            AppConfig::from_toml("[devops]\npersonal_access_token = \"secret-pat\"").unwrap();
        assert!(!format!("{config:?}").contains("secret-pat"));
    }
}
