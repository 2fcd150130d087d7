//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → GoatConfig (validated, immutable)
//!     → handed to the listener manager at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; ports and TLS material are fixed for the process
//! - All fields have defaults so an empty file (or no file) is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GoatConfig, LimitsConfig, ListenerConfig, ListenersConfig, LogFormat, ObservabilityConfig,
    TimeoutConfig, TlsListenerConfig,
};
pub use validation::{validate_config, ValidationError};
