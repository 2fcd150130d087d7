//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::accounts::SharedCounter;
use crate::security::{Channel, InsecureChannelDetector};

/// Per-listener handler context.
///
/// Each listener gets its own `AppState` carrying its fixed [`Channel`];
/// the counter and detector are shared between the two.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Which listener this state belongs to.
    pub channel: Channel,
    /// Identifier source shared by both listeners.
    pub counter: Arc<SharedCounter>,
    /// Insecure-channel detector shared by both listeners.
    pub detector: InsecureChannelDetector,
}

impl AppState {
    pub fn new(
        channel: Channel,
        counter: Arc<SharedCounter>,
        detector: InsecureChannelDetector,
    ) -> Self {
        Self {
            channel,
            counter,
            detector,
        }
    }

    /// Same shared resources, different listener.
    pub fn for_channel(&self, channel: Channel) -> Self {
        Self {
            channel,
            counter: Arc::clone(&self.counter),
            detector: self.detector.clone(),
        }
    }
}
