//! Process-wide identifier counter shared by both listeners.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter handing out record identifiers and token suffixes.
///
/// Starts at zero. Every call to [`SharedCounter::increment_and_get`] returns
/// a value exactly one greater than some previous call, so concurrent callers
/// on either listener never observe the same value.
#[derive(Debug, Default)]
pub struct SharedCounter {
    value: AtomicU64,
}

impl SharedCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increment and return the post-increment value.
    pub fn increment_and_get(&self) -> u64 {
        // fetch_add is a single read-modify-write, so no update is lost.
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last value handed out (zero if none yet).
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}
