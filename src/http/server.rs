//! Dual listener manager.
//!
//! # Responsibilities
//! - Load TLS material and bind both sockets before anything serves
//! - Serve the same route table on the TLS and plaintext listeners
//! - Share one counter and one detector between them
//! - Stop both on shutdown, or stop the survivor when one listener dies

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};

use crate::accounts::SharedCounter;
use crate::config::GoatConfig;
use crate::http::router;
use crate::http::state::AppState;
use crate::net::{load_tls_config, BoundListener, ListenerError, TlsError};
use crate::security::{Channel, InsecureChannelDetector};

/// Error type for the listener manager. Every variant is fatal.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Tls(#[from] TlsError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// The training server: two listeners, one handler set.
pub struct GoatServer {
    config: GoatConfig,
    counter: Arc<SharedCounter>,
    detector: InsecureChannelDetector,
}

impl GoatServer {
    /// Create a server with a fresh counter starting at zero.
    pub fn new(config: GoatConfig) -> Self {
        Self {
            config,
            counter: Arc::new(SharedCounter::new()),
            detector: InsecureChannelDetector::new(),
        }
    }

    /// Handle on the shared counter.
    pub fn counter(&self) -> Arc<SharedCounter> {
        Arc::clone(&self.counter)
    }

    /// Handle on the shared detector.
    pub fn detector(&self) -> InsecureChannelDetector {
        self.detector.clone()
    }

    /// Perform every fallible startup step.
    ///
    /// TLS material is loaded first, then the TLS socket, then the plaintext
    /// socket. If any step fails nothing has started serving and already
    /// bound sockets are closed on drop.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let tls_config = &self.config.listeners.tls;
        let rustls = load_tls_config(
            Path::new(&tls_config.cert_path),
            Path::new(&tls_config.key_path),
        )
        .await?;

        let tls = BoundListener::bind(Channel::Encrypted, &tls_config.bind_address).await?;
        let plaintext = BoundListener::bind(
            Channel::Plaintext,
            &self.config.listeners.plaintext.bind_address,
        )
        .await?;

        let state = AppState::new(Channel::Encrypted, self.counter, self.detector);
        let tls_router = router::build(state.clone(), &self.config);
        let plaintext_router = router::build(state.for_channel(Channel::Plaintext), &self.config);

        Ok(BoundServer {
            tls,
            plaintext,
            rustls,
            tls_router,
            plaintext_router,
            tls_handle: Handle::new(),
            plaintext_handle: Handle::new(),
            shutdown_grace: self.config.timeouts.shutdown_grace(),
        })
    }
}

/// Both sockets bound, ready to serve.
pub struct BoundServer {
    tls: BoundListener,
    plaintext: BoundListener,
    rustls: RustlsConfig,
    tls_router: Router,
    plaintext_router: Router,
    tls_handle: Handle,
    plaintext_handle: Handle,
    shutdown_grace: Duration,
}

impl BoundServer {
    pub fn tls_addr(&self) -> SocketAddr {
        self.tls.local_addr()
    }

    pub fn plaintext_addr(&self) -> SocketAddr {
        self.plaintext.local_addr()
    }

    /// Serve both listeners until `shutdown` fires.
    ///
    /// Returns `Ok` after a requested shutdown has drained both listeners.
    /// If either listener stops on its own, the other is stopped too and the
    /// first failure is returned. A closed shutdown channel counts as a
    /// shutdown request.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let tls_handle = self.tls_handle;
        let plaintext_handle = self.plaintext_handle;

        tracing::info!(
            tls = %self.tls.local_addr(),
            plaintext = %self.plaintext.local_addr(),
            "iGoat server initialized; accepting connections..."
        );

        let tls_server = axum_server::tls_rustls::from_tcp_rustls(self.tls.into_std(), self.rustls)
            .handle(tls_handle.clone())
            .serve(self.tls_router.into_make_service());
        let plaintext_server = axum_server::from_tcp(self.plaintext.into_std())
            .handle(plaintext_handle.clone())
            .serve(self.plaintext_router.into_make_service());

        let mut tls_task: JoinHandle<io::Result<()>> = tokio::spawn(tls_server);
        let mut plaintext_task: JoinHandle<io::Result<()>> = tokio::spawn(plaintext_server);

        let stop_all = |grace: Duration| {
            tls_handle.graceful_shutdown(Some(grace));
            plaintext_handle.graceful_shutdown(Some(grace));
        };

        let first = tokio::select! {
            _ = shutdown.recv() => None,
            res = &mut tls_task => Some((Channel::Encrypted, res)),
            res = &mut plaintext_task => Some((Channel::Plaintext, res)),
        };

        stop_all(self.shutdown_grace);

        match first {
            None => {
                tracing::info!("Shutdown requested, draining listeners");
                let tls = finish(Channel::Encrypted, tls_task.await);
                let plaintext = finish(Channel::Plaintext, plaintext_task.await);
                tls?;
                plaintext?;
                tracing::info!("Listeners stopped");
                Ok(())
            }
            Some((channel, res)) => {
                let err = failure(channel, res);
                tracing::error!(error = %err, "Listener died, stopping the other listener");
                // The finished task must not be polled again.
                let _ = match channel {
                    Channel::Encrypted => plaintext_task.await,
                    Channel::Plaintext => tls_task.await,
                };
                Err(err.into())
            }
        }
    }
}

fn finish(channel: Channel, res: Result<io::Result<()>, JoinError>) -> Result<(), ListenerError> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(ListenerError::Serve { channel, source }),
        Err(source) => Err(ListenerError::Join { channel, source }),
    }
}

/// A listener that returned before shutdown was requested always counts as failed.
fn failure(channel: Channel, res: Result<io::Result<()>, JoinError>) -> ListenerError {
    match finish(channel, res) {
        Ok(()) => ListenerError::Exited { channel },
        Err(err) => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_missing_tls() -> GoatConfig {
        let mut config = GoatConfig::default();
        config.listeners.plaintext.bind_address = "127.0.0.1:0".into();
        config.listeners.tls.bind_address = "127.0.0.1:0".into();
        config.listeners.tls.cert_path = "/nonexistent/goat/server.crt".into();
        config.listeners.tls.key_path = "/nonexistent/goat/server.key".into();
        config
    }

    fn config_with_tls(dir: &Path) -> GoatConfig {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.join("server.crt");
        let key_path = dir.join("server.key");
        std::fs::write(&cert_path, cert.pem()).unwrap();
        std::fs::write(&key_path, key_pair.serialize_pem()).unwrap();

        let mut config = config_with_missing_tls();
        config.listeners.tls.cert_path = cert_path.display().to_string();
        config.listeners.tls.key_path = key_path.display().to_string();
        config.timeouts.shutdown_grace_secs = 1;
        config
    }

    #[tokio::test]
    async fn listener_dying_mid_run_stops_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let bound = GoatServer::new(config_with_tls(dir.path()))
            .bind()
            .await
            .unwrap();
        let tls_addr = bound.tls_addr();
        let plaintext_handle = bound.plaintext_handle.clone();

        let (_stop, rx) = broadcast::channel(1);
        let run = tokio::spawn(bound.run(rx));

        assert!(plaintext_handle.listening().await.is_some());

        // Kill only the plaintext listener; no shutdown is requested.
        plaintext_handle.shutdown();

        let err = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("run should return once a listener dies")
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            ServerError::Listener(ListenerError::Exited {
                channel: Channel::Plaintext
            })
        ));
        assert!(tokio::net::TcpStream::connect(tls_addr).await.is_err());
    }

    #[tokio::test]
    async fn missing_tls_material_fails_before_binding() {
        let err = GoatServer::new(config_with_missing_tls())
            .bind()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServerError::Tls(TlsError::Read { .. })));
    }

    #[test]
    fn early_clean_exit_is_still_a_failure() {
        let err = failure(Channel::Plaintext, Ok(Ok(())));
        assert!(matches!(
            err,
            ListenerError::Exited {
                channel: Channel::Plaintext
            }
        ));
    }

    #[test]
    fn serve_error_keeps_channel() {
        let err = failure(
            Channel::Encrypted,
            Ok(Err(io::Error::new(io::ErrorKind::Other, "boom"))),
        );
        assert!(err.to_string().contains("encrypted listener failed"));
    }

    #[test]
    fn fresh_server_counter_starts_at_zero() {
        let server = GoatServer::new(GoatConfig::default());
        assert_eq!(server.counter().current(), 0);
        assert_eq!(server.detector().warnings_emitted(), 0);
    }
}
