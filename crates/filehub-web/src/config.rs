//! Stream endpoint configuration.

use filehub_core::{LiveError, LiveResult};
use std::time::Duration;

/// Default interval between keep-alive comments.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

/// Default number of undelivered payloads a connection may buffer.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Tuning for open stream connections.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Interval between keep-alive comments on idle streams.
    pub keep_alive: Duration,
    /// Payloads buffered per connection before it counts as failed.
    pub subscriber_buffer: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

impl LiveConfig {
    /// Build a validated config from raw values.
    pub fn new(keep_alive_secs: u64, subscriber_buffer: usize) -> LiveResult<Self> {
        let config = Self {
            keep_alive: Duration::from_secs(keep_alive_secs),
            subscriber_buffer,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LiveResult<()> {
        if self.keep_alive.is_zero() {
            return Err(LiveError::config("keep-alive interval must be greater than zero"));
        }
        if self.subscriber_buffer == 0 {
            return Err(LiveError::config("subscriber buffer must hold at least one message"));
        }
        Ok(())
    }
}
