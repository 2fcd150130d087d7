//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (load certificate chain + key, build rustls config)
//!     → listener.rs (bind TLS socket, bind plaintext socket)
//!     → Hand both sockets to the listener manager (http/server.rs)
//! ```
//!
//! # Design Decisions
//! - Every fallible socket or TLS step runs before either listener serves
//! - Client certificates are never requested
//! - Sockets are bound up front so port 0 can be resolved for tests

pub mod listener;
pub mod tls;

pub use listener::{BoundListener, ListenerError};
pub use tls::{load_tls_config, TlsError};
