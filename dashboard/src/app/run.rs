//! Local server run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run the local dashboard server until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashboardError> {
    info!("Initializing PrintNet dashboard server...");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let http_client = Arc::new(HttpClient::new(&options.backend_base_url)?);
    info!("Relaying /api/me to {}", http_client.base_url());
    if options.route_guard.enabled {
        info!("Route guard enabled, redirecting to {}", options.route_guard.redirect_to);
    }
    let state = Arc::new(ServerState::new(http_client, options.route_guard.clone()));

    let server_handle = serve(&options.server, state, async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_signal.await;
    info!("Shutting down PrintNet dashboard server...");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(options.max_shutdown_delay, server_handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(DashboardError::ServerError(e.to_string())),
        Err(_) => {
            error!(
                "Shutdown timed out after {:?}, dropping open connections",
                options.max_shutdown_delay
            );
            Err(DashboardError::ServerError("shutdown timed out".to_string()))
        }
    }
}
