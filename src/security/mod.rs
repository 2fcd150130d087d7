//! Channel security subsystem.
//!
//! # Data Flow
//! ```text
//! Listener (TLS or plaintext)
//!     → channel.rs (Channel flag fixed per listener)
//!     → handler calls InsecureChannelDetector::on_request
//!     → WARN log + exposure metric when plaintext
//!     → X-Goat-Secure response header
//! ```
//!
//! # Design Decisions
//! - The flag comes from which listener accepted the request, never from
//!   headers or payload
//! - Warnings go to the operator log only; clients just see the header

pub mod channel;

pub use channel::{Channel, InsecureChannelDetector, SECURE_HEADER};
