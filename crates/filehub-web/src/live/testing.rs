//! In-memory subscriber used by the live module tests.

use filehub_core::{LiveError, LiveResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::subscriber::{Payload, Subscriber, SubscriberId};

#[derive(Default)]
pub struct RecordingSubscriber {
    id: u64,
    received: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    closes: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingSubscriber {
    pub fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id,
            ..Default::default()
        })
    }

    pub fn failing(id: u64) -> Arc<Self> {
        let sub = Self::new(id);
        sub.failing.store(true, Ordering::SeqCst);
        sub
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Subscriber for RecordingSubscriber {
    fn id(&self) -> SubscriberId {
        SubscriberId::new(self.id)
    }

    fn deliver(&self, payload: &Payload) -> LiveResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LiveError::delivery(self.id, "connection reset"));
        }
        self.received.lock().unwrap().push(payload.to_string());
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
