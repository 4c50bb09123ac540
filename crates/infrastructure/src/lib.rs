//! Infrastructure layer - Adapters for external systems
//!
//! Implements the tracker port on top of the Azure DevOps client, and holds
//! configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, DevOpsAppConfig, Environment, ServerConfig};
pub use telemetry::{LogFormat, TelemetryError, init_logging};
