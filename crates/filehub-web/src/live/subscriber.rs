//! Subscriber handles for open stream connections.

use filehub_core::{LiveError, LiveResult};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

/// A serialized event, shared by every subscriber of one broadcast.
pub type Payload = Arc<str>;

/// Identity of one open connection. Allocated by the registry, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The capability the registry and broadcaster need from a connection.
///
/// Implementations must make `deliver` non-blocking and `close` idempotent.
pub trait Subscriber: Send + Sync {
    fn id(&self) -> SubscriberId;

    /// Hand one payload to the transport.
    fn deliver(&self, payload: &Payload) -> LiveResult<()>;

    /// Terminate the transport. Safe to call any number of times.
    fn close(&self);
}

/// Lifecycle of a stream connection. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Subscriber backed by a bounded tokio channel drained by the SSE response.
pub struct ChannelSubscriber {
    id: SubscriberId,
    tx: Mutex<Option<mpsc::Sender<Payload>>>,
    state: AtomicU8,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiving half its connection reads from.
    pub fn channel(id: SubscriberId, buffer: usize) -> (Self, mpsc::Receiver<Payload>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let subscriber = Self {
            id,
            tx: Mutex::new(Some(tx)),
            state: AtomicU8::new(ConnectionState::Connecting as u8),
        };
        (subscriber, rx)
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move to `next` unless the connection is already further along.
    pub(crate) fn advance(&self, next: ConnectionState) -> ConnectionState {
        let previous = self.state.fetch_max(next as u8, Ordering::AcqRel);
        ConnectionState::from_u8(previous)
    }

    pub fn is_closed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Subscriber for ChannelSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn deliver(&self, payload: &Payload) -> LiveResult<()> {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = guard
            .as_ref()
            .ok_or_else(|| LiveError::delivery(self.id.as_u64(), "transport closed"))?;

        tx.try_send(Arc::clone(payload)).map_err(|e| match e {
            TrySendError::Full(_) => LiveError::delivery(self.id.as_u64(), "send buffer full"),
            TrySendError::Closed(_) => LiveError::delivery(self.id.as_u64(), "receiver dropped"),
        })
    }

    fn close(&self) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        if tx.is_some() {
            self.advance(ConnectionState::Closing);
            debug!(subscriber = %self.id, "Subscriber transport closed");
        }
    }
}
