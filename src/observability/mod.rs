//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and listeners produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (request, exposure and rejection counters)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Metric updates are no-ops until a recorder is installed, so tests and
//!   deployments without Prometheus pay nothing

pub mod logging;
pub mod metrics;
