//! Application state.

use filehub_core::FileEvent;
use std::sync::Arc;

use crate::config::LiveConfig;
use crate::live::{Broadcaster, Registry};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<Broadcaster>,
    pub config: LiveConfig,
}

impl AppState {
    pub fn new(config: LiveConfig) -> Self {
        let registry = Arc::new(Registry::new());
        Self {
            broadcaster: Arc::new(Broadcaster::new(registry)),
            config,
        }
    }

    /// Broadcast a file event to all stream clients.
    pub fn notify(&self, event: &FileEvent) {
        self.broadcaster.notify(event);
    }
}
