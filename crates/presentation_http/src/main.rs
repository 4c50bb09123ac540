//! WorkTree HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{WorkItemService, ports::WorkItemTrackerPort};
use infrastructure::{AppConfig, AzureDevOpsAdapter, LogFormat, init_logging};
use presentation_http::{
    error::set_expose_internal_errors, routes, shutdown::serve_with_drain_timeout, state::AppState,
};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "worktree_server=debug,presentation_http=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first: it decides the log format
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_logging(DEFAULT_LOG_FILTER, LogFormat::from_config(&config.server.log_format))?;

    info!("WorkTree v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    for warning in config.startup_warnings() {
        warn!("{warning}");
    }

    info!(
        environment = %config.environment(),
        host = %config.server.host,
        port = config.server.port,
        organization = %config.devops.organization,
        project = ?config.devops.project,
        "Configuration loaded"
    );

    set_expose_internal_errors(!config.is_production());

    // Tracker client, shared by every request
    let tracker: Arc<dyn WorkItemTrackerPort> = Arc::new(
        AzureDevOpsAdapter::new(&config.devops)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Azure DevOps client: {e}"))?,
    );
    let work_items = WorkItemService::with_query(tracker, config.devops.wiql.clone());

    let state = AppState {
        work_items: Arc::new(work_items),
        config: Arc::new(config.clone()),
    };

    let app = routes::create_router(state).layer(cors_layer(&config));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });
    serve_with_drain_timeout(server, signalled_rx, shutdown_timeout).await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Allow any origin unless origins are configured
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
