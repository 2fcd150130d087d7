//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS listener ──┐
//!                ├→ router.rs (same Route table, per-listener AppState)
//! HTTP listener ─┘     → handlers.rs (register_user | issue_token)
//!                      → detector + shared counter
//!                      → response.rs (X-Goat-Secure, errors)
//! ```
//!
//! # Design Decisions
//! - Routes are an explicit enum, not discovered
//! - The channel flag lives in state, so handlers cannot confuse listeners
//! - server.rs owns the counter and hands clones of its `Arc` to both routers

pub mod handlers;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

pub use router::Route;
pub use server::{BoundServer, GoatServer, ServerError};
pub use state::AppState;
