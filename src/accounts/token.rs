//! Session tokens handed out by the token endpoint.
//!
//! Tokens are never stored or checked again. The numeric suffix is the shared
//! counter value, which is exactly as guessable as it looks.

use std::fmt;

/// Fixed prefix of every session token.
pub const TOKEN_PREFIX: &str = "34A7EF-115C24-8F21CD";

/// Name of the cookie carrying the token.
pub const SESSION_COOKIE: &str = "SessionID";

/// A token of the form `34A7EF-115C24-8F21CD-<counter>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken {
    counter: u64,
}

impl SessionToken {
    pub fn new(counter: u64) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// `Set-Cookie` value for this token, with no attributes.
    pub fn cookie(&self) -> String {
        format!("{SESSION_COOKIE}={self}")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOKEN_PREFIX}-{}", self.counter)
    }
}
