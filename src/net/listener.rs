//! TCP socket binding for the two listeners.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::security::Channel;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Configured address does not parse.
    #[error("{channel} listener: invalid bind address '{value}': {source}")]
    InvalidAddress {
        channel: Channel,
        value: String,
        #[source]
        source: AddrParseError,
    },
    /// Failed to bind to address.
    #[error("{channel} listener: failed to bind {addr}: {source}")]
    Bind {
        channel: Channel,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// The server loop failed while running.
    #[error("{channel} listener failed: {source}")]
    Serve {
        channel: Channel,
        #[source]
        source: std::io::Error,
    },
    /// The server loop returned without being asked to stop.
    #[error("{channel} listener stopped unexpectedly")]
    Exited { channel: Channel },
    /// The listener task panicked or was aborted.
    #[error("{channel} listener task failed: {source}")]
    Join {
        channel: Channel,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// A socket bound for one channel but not yet serving.
#[derive(Debug)]
pub struct BoundListener {
    channel: Channel,
    inner: std::net::TcpListener,
    local_addr: SocketAddr,
}

impl BoundListener {
    /// Bind `bind_address` for `channel`.
    pub async fn bind(channel: Channel, bind_address: &str) -> Result<Self, ListenerError> {
        let addr: SocketAddr =
            bind_address
                .parse()
                .map_err(|source| ListenerError::InvalidAddress {
                    channel,
                    value: bind_address.to_string(),
                    source,
                })?;

        let bind_err = |source| ListenerError::Bind {
            channel,
            addr,
            source,
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        // into_std leaves the socket non-blocking, which axum-server expects.
        let inner = listener.into_std().map_err(bind_err)?;

        tracing::info!(channel = %channel, address = %local_addr, "Listener bound");

        Ok(Self {
            channel,
            inner,
            local_addr,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn into_std(self) -> std::net::TcpListener {
        self.inner
    }
}
