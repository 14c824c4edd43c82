//! Live update fan-out.
//!
//! Open stream connections register a subscriber in the process-wide
//! [`Registry`]; mutation handlers publish through the [`Broadcaster`].

pub mod broadcaster;
pub mod connection;
pub mod registry;
pub mod subscriber;

#[cfg(test)]
mod testing;

pub use broadcaster::Broadcaster;
pub use connection::{open, SubscriberStream};
pub use registry::Registry;
pub use subscriber::{ChannelSubscriber, ConnectionState, Payload, Subscriber, SubscriberId};
