//! Process-wide set of open stream subscribers.
//!
//! The registry only tracks membership. Each connection owns its subscriber
//! and the registry keeps a `Weak` reference, so a connection that vanished
//! without unregistering can never be delivered to.

use filehub_core::{LiveError, LiveResult};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::{debug, info};

use super::subscriber::{Subscriber, SubscriberId};

/// Registry of active subscribers.
pub struct Registry {
    next_id: AtomicU64,
    members: RwLock<HashMap<SubscriberId, Weak<dyn Subscriber>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate an identity for a new connection.
    pub fn next_id(&self) -> SubscriberId {
        SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a subscriber.
    ///
    /// Adding the same id twice is a connection setup bug and fails with
    /// `DuplicateRegistration`; the existing member is left untouched.
    pub fn add<S: Subscriber + 'static>(&self, subscriber: &Arc<S>) -> LiveResult<()> {
        let id = subscriber.id();
        let weak = Arc::downgrade(subscriber);
        let weak: Weak<dyn Subscriber> = weak;

        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        match members.entry(id) {
            Entry::Occupied(_) => Err(LiveError::DuplicateRegistration(id.as_u64())),
            Entry::Vacant(slot) => {
                slot.insert(weak);
                debug!(subscriber = %id, active = members.len(), "Subscriber registered");
                Ok(())
            }
        }
    }

    /// Unregister a subscriber. Returns whether it was present.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        let removed = members.remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, active = members.len(), "Subscriber unregistered");
        }
        removed
    }

    /// Point-in-time copy of the live members.
    ///
    /// The lock is released before this returns, so callers may perform
    /// slow delivery without blocking registration.
    pub fn snapshot(&self) -> Vec<Arc<dyn Subscriber>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter_map(Weak::upgrade)
            .collect()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unregister and close every subscriber. Used on server shutdown.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, weak)| weak)
            .collect();

        let mut closed = 0;
        for subscriber in drained.iter().filter_map(Weak::upgrade) {
            subscriber.close();
            closed += 1;
        }
        info!(closed, "Closed all stream subscribers");
        closed
    }
}
