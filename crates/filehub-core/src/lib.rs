//! Filehub Core Library
//!
//! Domain events and error types for the live update fan-out of the
//! file-hosting service.

pub mod error;
pub mod event;
pub mod notifier;

pub use error::{LiveError, LiveResult};
pub use event::{EventKind, FileEvent, FileSummary};
pub use notifier::LiveNotifier;
