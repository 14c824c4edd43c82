//! Centralized error types for the live update subsystem.

use thiserror::Error;

/// Main error type for live update operations.
#[derive(Error, Debug)]
pub enum LiveError {
    #[error("Delivery to subscriber {subscriber} failed: {reason}")]
    DeliveryFailed { subscriber: u64, reason: String },

    #[error("Subscriber {0} is already registered")]
    DuplicateRegistration(u64),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for live update operations.
pub type LiveResult<T> = Result<T, LiveError>;

impl LiveError {
    /// Create a delivery failure for the given subscriber.
    pub fn delivery(subscriber: u64, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            subscriber,
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
