//! Logging setup
//!
//! Installs a `tracing` subscriber with an `EnvFilter` (`RUST_LOG` wins over
//! the supplied default) and a text or JSON formatter.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors during logging setup
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("Invalid log format: {other}. Use 'text' or 'json'")),
        }
    }
}

impl LogFormat {
    /// Parse a configured format, falling back to text for unknown values
    #[must_use]
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Install the global subscriber
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid.
pub fn init_logging(default_filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))
}
