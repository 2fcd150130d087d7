//! iGoat training server library.
//!
//! Serves account registration and token issuance on a TLS port and a
//! plaintext port at the same time, so the two captures can be compared.

pub mod accounts;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use config::GoatConfig;
pub use http::{BoundServer, GoatServer};
pub use lifecycle::Shutdown;
