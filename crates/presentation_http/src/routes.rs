//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes
///
/// Tracing and request ids are attached here so tests see the same stack as
/// the server; CORS stays in `main` because it depends on deployment.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_json_bytes;

    Router::new()
        // Web client
        .route("/", get(handlers::web::index))
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Legacy surface used by the web client
        .route(
            "/TFS",
            get(handlers::work_items::list_work_items)
                .post(handlers::work_items::update_work_items),
        )
        // Work item API (v1)
        .route("/v1/work-items", get(handlers::work_items::list_work_items))
        .route(
            "/v1/work-items/update",
            post(handlers::work_items::update_work_items_report),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestIdLayer::new())
        .layer(TraceLayer::new_for_http())
        // Attach state
        .with_state(state)
}
