//! Channel security flag and the insecure-channel detector.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};

use crate::observability::metrics;

/// Response header reporting whether the request arrived over TLS.
pub const SECURE_HEADER: HeaderName = HeaderName::from_static("x-goat-secure");

/// Which listener accepted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The TLS listener.
    Encrypted,
    /// The plaintext HTTP listener.
    Plaintext,
}

impl Channel {
    pub fn is_secure(self) -> bool {
        matches!(self, Channel::Encrypted)
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Encrypted => "encrypted",
            Channel::Plaintext => "plaintext",
        }
    }

    /// `X-Goat-Secure` header pair, `"true"` or `"false"`.
    pub fn secure_header(self) -> [(HeaderName, HeaderValue); 1] {
        let value = if self.is_secure() { "true" } else { "false" };
        [(SECURE_HEADER, HeaderValue::from_static(value))]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warns the operator whenever sensitive data crossed a plaintext channel.
///
/// Clones share one warning count, so every handler on both listeners
/// reports into the same tally.
#[derive(Debug, Clone, Default)]
pub struct InsecureChannelDetector {
    warnings: Arc<AtomicU64>,
}

impl InsecureChannelDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one request. A no-op on [`Channel::Encrypted`].
    pub fn on_request(&self, channel: Channel, endpoint: &'static str, context_message: &str) {
        if channel.is_secure() {
            return;
        }

        self.warnings.fetch_add(1, Ordering::Relaxed);
        metrics::record_exposure(endpoint);

        tracing::warn!(
            target: "goat_server::exposure",
            channel = %channel,
            endpoint,
            "WARNING: {context_message}"
        );
    }

    /// Number of warnings emitted so far.
    pub fn warnings_emitted(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }
}
