//! Lifecycle of one stream connection.
//!
//! `open` registers a fresh subscriber and hands back a stream of payloads
//! that owns the connection. Dropping the stream (client disconnect, server
//! shutdown, or the stream ending after a failed delivery closed it) runs
//! the teardown exactly as often as it is needed: registry removal and
//! transport close are both idempotent.

use filehub_core::LiveResult;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::info;

use super::registry::Registry;
use super::subscriber::{ChannelSubscriber, ConnectionState, Payload, Subscriber, SubscriberId};

/// Register a new subscriber and return the connection's payload stream.
pub fn open(registry: &Arc<Registry>, buffer: usize) -> LiveResult<SubscriberStream> {
    let id = registry.next_id();
    let (subscriber, rx) = ChannelSubscriber::channel(id, buffer);
    let subscriber = Arc::new(subscriber);

    registry.add(&subscriber)?;
    subscriber.advance(ConnectionState::Open);
    info!(subscriber = %id, active = registry.len(), "Stream client connected");

    Ok(SubscriberStream {
        rx,
        guard: ConnectionGuard {
            subscriber,
            registry: Arc::clone(registry),
        },
    })
}

/// Tears the connection down when dropped.
struct ConnectionGuard {
    subscriber: Arc<ChannelSubscriber>,
    registry: Arc<Registry>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let id = self.subscriber.id();
        self.subscriber.advance(ConnectionState::Closing);
        self.registry.remove(id);
        self.subscriber.close();
        self.subscriber.advance(ConnectionState::Closed);
        info!(subscriber = %id, active = self.registry.len(), "Stream client disconnected");
    }
}

/// Payloads delivered to one connection, in broadcast order.
pub struct SubscriberStream {
    rx: mpsc::Receiver<Payload>,
    guard: ConnectionGuard,
}

impl SubscriberStream {
    pub fn id(&self) -> SubscriberId {
        self.guard.subscriber.id()
    }

    pub fn state(&self) -> ConnectionState {
        self.guard.subscriber.state()
    }

    /// The subscriber handle, as the broadcaster sees it.
    pub fn subscriber(&self) -> Arc<ChannelSubscriber> {
        Arc::clone(&self.guard.subscriber)
    }
}

impl Stream for SubscriberStream {
    type Item = Payload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::broadcaster::Broadcaster;
    use filehub_core::FileEvent;
    use futures::StreamExt;

    #[test]
    fn test_open_registers() {
        let registry = Arc::new(Registry::new());
        let stream = open(&registry, 8).unwrap();

        assert_eq!(stream.state(), ConnectionState::Open);
        assert!(registry.contains(stream.id()));
    }

    #[test]
    fn test_drop_unregisters() {
        let registry = Arc::new(Registry::new());
        let stream = open(&registry, 8).unwrap();
        let subscriber = stream.subscriber();
        let id = stream.id();

        drop(stream);

        assert!(!registry.contains(id));
        assert!(registry.snapshot().is_empty());
        assert_eq!(subscriber.state(), ConnectionState::Closed);
        assert!(subscriber.is_closed());
    }

    #[test]
    fn test_each_connection_gets_new_id() {
        let registry = Arc::new(Registry::new());
        let first = open(&registry, 8).unwrap();
        let first_id = first.id();
        drop(first);
        let second = open(&registry, 8).unwrap();
        assert_ne!(first_id, second.id());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_stream_in_order() {
        let broadcaster = Broadcaster::new(Arc::new(Registry::new()));
        let mut stream = open(broadcaster.registry(), 8).unwrap();

        broadcaster.notify(&FileEvent::removed("e1"));
        broadcaster.notify(&FileEvent::removed("e2"));

        let first = stream.next().await.unwrap();
        let second = stream.next().await.unwrap();
        assert!(first.contains("\"fileId\":\"e1\""));
        assert!(second.contains("\"fileId\":\"e2\""));
    }

    #[tokio::test]
    async fn test_slow_client_is_swept_and_stream_ends() {
        let broadcaster = Broadcaster::new(Arc::new(Registry::new()));
        let mut stream = open(broadcaster.registry(), 1).unwrap();
        let id = stream.id();

        broadcaster.notify(&FileEvent::removed("e1"));
        broadcaster.notify(&FileEvent::removed("e2"));

        assert!(!broadcaster.registry().contains(id));
        assert_eq!(stream.state(), ConnectionState::Closing);
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());

        drop(stream);
        assert!(broadcaster.registry().is_empty());
    }

    #[tokio::test]
    async fn test_close_all_ends_open_streams() {
        let registry = Arc::new(Registry::new());
        let mut a = open(&registry, 8).unwrap();
        let mut b = open(&registry, 8).unwrap();

        assert_eq!(registry.close_all(), 2);
        assert!(a.next().await.is_none());
        assert!(b.next().await.is_none());
    }
}
