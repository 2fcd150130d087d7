//! iGoat insecure-transport training server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 GOAT SERVER                  │
//!   HTTPS :8443        │  ┌──────────┐                                │
//!  ────────────────────┼─▶│ TLS      │──┐   ┌──────────┐  ┌─────────┐ │
//!                      │  │ listener │  │   │ handlers │─▶│ shared  │ │
//!   HTTP  :8080        │  └──────────┘  ├──▶│ user /   │  │ counter │ │
//!  ────────────────────┼─▶┌──────────┐  │   │ token    │  └─────────┘ │
//!                      │  │ plain    │──┘   └────┬─────┘              │
//!                      │  │ listener │           ▼                    │
//!                      │  └──────────┘   insecure-channel detector    │
//!                      │                 (WARN log when plaintext)    │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use goat_server::config::{load_config, validate_config, ConfigError, GoatConfig};
use goat_server::lifecycle::{launch, Shutdown};
use goat_server::observability::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "goat-server")]
#[command(about = "Deliberately insecure iGoat training server (HTTP + HTTPS)", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plaintext listener address.
    #[arg(long = "http")]
    http_addr: Option<String>,

    /// TLS listener address.
    #[arg(long = "https")]
    https_addr: Option<String>,

    /// PEM certificate chain for the TLS listener.
    #[arg(long)]
    cert: Option<PathBuf>,

    /// PEM private key for the TLS listener.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Log level or filter directive.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Load the file (if any), apply overrides, validate the result.
    fn into_config(self) -> Result<GoatConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GoatConfig::default(),
        };

        if let Some(addr) = self.http_addr {
            config.listeners.plaintext.bind_address = addr;
        }
        if let Some(addr) = self.https_addr {
            config.listeners.tls.bind_address = addr;
        }
        if let Some(cert) = self.cert {
            config.listeners.tls.cert_path = cert.display().to_string();
        }
        if let Some(key) = self.key {
            config.listeners.tls.key_path = key.display().to_string();
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logging is not up yet, so early failures go straight to stderr.
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("ERROR: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "goat-server starting");

    if let Err(e) = launch(config, Shutdown::new()).await {
        tracing::error!(error = %e, "Fatal error, exiting");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "goat-server",
            "--http",
            "127.0.0.1:18080",
            "--https",
            "127.0.0.1:18443",
            "--cert",
            "/tmp/goat.crt",
            "--key",
            "/tmp/goat.key",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.listeners.plaintext.bind_address, "127.0.0.1:18080");
        assert_eq!(config.listeners.tls.bind_address, "127.0.0.1:18443");
        assert_eq!(config.listeners.tls.cert_path, "/tmp/goat.crt");
        assert_eq!(config.listeners.tls.key_path, "/tmp/goat.key");
    }

    #[test]
    fn conflicting_overrides_are_rejected() {
        let cli = Cli::parse_from(["goat-server", "--https", "0.0.0.0:8080"]);
        assert!(matches!(
            cli.into_config(),
            Err(ConfigError::Validation(_))
        ));
    }
}
