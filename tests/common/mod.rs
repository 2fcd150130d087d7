//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use goat_server::accounts::SharedCounter;
use goat_server::config::GoatConfig;
use goat_server::http::{GoatServer, ServerError};
use goat_server::lifecycle::Shutdown;
use goat_server::security::InsecureChannelDetector;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Write a fresh self-signed certificate and key for `localhost`.
pub fn write_self_signed(dir: &Path) -> (String, String) {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_path = dir.join("server.crt");
    let key_path = dir.join("server.key");
    std::fs::write(&cert_path, cert.pem()).unwrap();
    std::fs::write(&key_path, key_pair.serialize_pem()).unwrap();
    (
        cert_path.display().to_string(),
        key_path.display().to_string(),
    )
}

/// Config with both listeners on ephemeral loopback ports and TLS material in `dir`.
pub fn test_config(dir: &Path) -> GoatConfig {
    let (cert_path, key_path) = write_self_signed(dir);
    let mut config = GoatConfig::default();
    config.listeners.plaintext.bind_address = "127.0.0.1:0".into();
    config.listeners.tls.bind_address = "127.0.0.1:0".into();
    config.listeners.tls.cert_path = cert_path;
    config.listeners.tls.key_path = key_path;
    config.timeouts.shutdown_grace_secs = 1;
    config
}

/// A running server plus the handles tests need to inspect it.
pub struct TestServer {
    pub tls_addr: SocketAddr,
    pub plaintext_addr: SocketAddr,
    pub counter: Arc<SharedCounter>,
    pub detector: InsecureChannelDetector,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), ServerError>>,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let server = GoatServer::new(test_config(dir.path()));
        let counter = server.counter();
        let detector = server.detector();

        let bound = server.bind().await.unwrap_or_else(|e| panic!("bind failed: {e}"));
        let tls_addr = bound.tls_addr();
        let plaintext_addr = bound.plaintext_addr();

        let shutdown = Shutdown::new();
        let stop = shutdown.subscribe();
        let task = tokio::spawn(bound.run(stop));

        // Sockets are already bound, so connections queue until serving starts.
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            tls_addr,
            plaintext_addr,
            counter,
            detector,
            shutdown,
            task,
            _dir: dir,
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.plaintext_addr, path)
    }

    pub fn https_url(&self, path: &str) -> String {
        format!("https://{}{}", self.tls_addr, path)
    }

    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.task)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

/// Client that trusts any certificate and never uses a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
