//! WorkTree HTTP presentation layer
//!
//! JSON API over the work item services, plus the static web client.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestIdLayer, ValidatedJsonList, ValidationError};
pub use routes::create_router;
pub use state::AppState;
