//! File mutation events.

pub mod model;

pub use model::{EventKind, FileEvent, FileSummary};

use crate::error::LiveResult;

/// Serialize an event into the JSON text sent to stream clients.
pub fn encode(event: &FileEvent) -> LiveResult<String> {
    Ok(serde_json::to_string(event)?)
}
