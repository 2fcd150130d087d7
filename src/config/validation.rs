//! Configuration validation.
//!
//! Returns every problem found, not just the first, so an operator can fix
//! a config file in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GoatConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{first} and {second} both bind {addr}")]
    AddressConflict {
        first: &'static str,
        second: &'static str,
        addr: SocketAddr,
    },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GoatConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let plaintext = parse_addr(
        "listeners.plaintext.bind_address",
        &config.listeners.plaintext.bind_address,
        &mut errors,
    );
    let tls = parse_addr(
        "listeners.tls.bind_address",
        &config.listeners.tls.bind_address,
        &mut errors,
    );
    let metrics = if config.observability.metrics_enabled {
        parse_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        )
    } else {
        None
    };

    let bound = [
        ("listeners.plaintext.bind_address", plaintext),
        ("listeners.tls.bind_address", tls),
        ("observability.metrics_address", metrics),
    ];
    for (i, (first, a)) in bound.iter().enumerate() {
        for (second, b) in &bound[i + 1..] {
            if let (Some(a), Some(b)) = (a, b) {
                // Port 0 asks the OS for a fresh port, so it never collides.
                if a == b && a.port() != 0 {
                    errors.push(ValidationError::AddressConflict {
                        first: *first,
                        second: *second,
                        addr: *a,
                    });
                }
            }
        }
    }

    if config.listeners.tls.cert_path.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "listeners.tls.cert_path",
        });
    }
    if config.listeners.tls.key_path.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "listeners.tls.key_path",
        });
    }
    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "observability.log_level",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "limits.max_body_bytes",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_addr(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
