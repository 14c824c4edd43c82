//! Fan-out of file events to every open stream.

use filehub_core::{event, FileEvent};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::registry::Registry;
use super::subscriber::{Payload, Subscriber};

/// Publishes file events to all registered subscribers.
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Deliver an event to every subscriber present at call time.
    ///
    /// Best-effort: subscribers whose delivery fails are unregistered and
    /// closed after the loop, and nothing is reported to the caller.
    pub fn notify(&self, event: &FileEvent) {
        let payload: Payload = match event::encode(event) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                error!(kind = %event.kind(), error = %e, "Failed to serialize file event");
                return;
            }
        };

        let subscribers = self.registry.snapshot();
        if subscribers.is_empty() {
            debug!(kind = %event.kind(), file_id = %event.file_id(), "No stream subscribers");
            return;
        }

        let mut failed: Vec<Arc<dyn Subscriber>> = Vec::new();
        for subscriber in &subscribers {
            if let Err(e) = subscriber.deliver(&payload) {
                warn!(subscriber = %subscriber.id(), error = %e, "Dropping stream subscriber");
                failed.push(Arc::clone(subscriber));
            }
        }

        for subscriber in &failed {
            self.registry.remove(subscriber.id());
            subscriber.close();
        }

        debug!(
            kind = %event.kind(),
            file_id = %event.file_id(),
            delivered = subscribers.len() - failed.len(),
            failed = failed.len(),
            "Broadcast file event"
        );
    }
}
