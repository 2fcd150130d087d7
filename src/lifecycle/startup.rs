//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics recorder when enabled
//! - Load TLS material and bind both listeners
//! - Wire OS signals to the shutdown coordinator
//! - Serve until shutdown or a listener failure

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

use crate::config::GoatConfig;
use crate::http::{GoatServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Failures once config and logging are in place. All of them are fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),
    #[error("metrics setup failed: {0}")]
    Metrics(#[from] BuildError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run the server with a validated configuration until shutdown.
///
/// SIGINT/SIGTERM trigger `shutdown`; callers may also trigger it directly.
pub async fn launch(config: GoatConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    tracing::info!(
        tls = %config.listeners.tls.bind_address,
        plaintext = %config.listeners.plaintext.bind_address,
        cert = %config.listeners.tls.cert_path,
        "Starting listeners"
    );

    let server = GoatServer::new(config).bind().await?;
    let stop = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        signal_shutdown.trigger();
    });

    server.run(stop).await?;
    Ok(())
}
