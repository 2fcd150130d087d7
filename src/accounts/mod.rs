//! Account issuance subsystem.
//!
//! # Data Flow
//! ```text
//! POST /igoat/user
//!     → record.rs (decode body into an open field map)
//!     → counter.rs (next identifier)
//!     → record.rs (stamp `id`, pretty-print)
//!
//! GET /igoat/token
//!     → counter.rs (next identifier)
//!     → token.rs (PREFIX-<counter>)
//! ```
//!
//! # Design Decisions
//! - Nothing here is stored; records and tokens live for one request
//! - The counter is the only process-wide state and is owned by the
//!   listener manager, not a global

pub mod counter;
pub mod record;
pub mod token;

pub use counter::SharedCounter;
pub use record::{RecordError, UserRecord};
pub use token::SessionToken;
