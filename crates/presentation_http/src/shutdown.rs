//! Graceful shutdown with a bounded drain period

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{info, warn};

/// Drive `server` to completion, abandoning open connections once
/// `timeout` has elapsed after `signalled` fires.
///
/// A dropped sender never starts the clock.
pub async fn serve_with_drain_timeout<S, E>(
    server: S,
    signalled: oneshot::Receiver<()>,
    timeout: Duration,
) -> Result<(), E>
where
    S: IntoFuture<Output = Result<(), E>>,
{
    tokio::select! {
        result = server.into_future() => result,
        () = drain_deadline(signalled, timeout) => {
            warn!(?timeout, "Connections still open after shutdown timeout, exiting");
            Ok(())
        }
    }
}

async fn drain_deadline(signalled: oneshot::Receiver<()>, timeout: Duration) {
    if signalled.await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Waiting up to {:?} for connections to close...", timeout);
    tokio::time::sleep(timeout).await;
}
