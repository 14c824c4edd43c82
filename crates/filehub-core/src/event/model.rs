//! File event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The subset of a stored file's metadata that clients need to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    pub uploaded_by_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A storage mutation that connected clients should reflect.
///
/// Each variant has exactly one payload shape. `file_id` always equals
/// `file.id` when a summary is carried; deserialization rejects events
/// where the two disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", try_from = "RawFileEvent")]
pub enum FileEvent {
    /// A file was uploaded.
    #[serde(rename_all = "camelCase")]
    FileAdded { file_id: String, file: FileSummary },
    /// A file's metadata (description, visibility) changed.
    #[serde(rename_all = "camelCase")]
    FileUpdated { file_id: String, file: FileSummary },
    /// A file was deleted.
    #[serde(rename_all = "camelCase")]
    FileRemoved { file_id: String },
}

/// Wire form of [`FileEvent`] before the id check.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawFileEvent {
    #[serde(rename_all = "camelCase")]
    FileAdded { file_id: String, file: FileSummary },
    #[serde(rename_all = "camelCase")]
    FileUpdated { file_id: String, file: FileSummary },
    #[serde(rename_all = "camelCase")]
    FileRemoved { file_id: String },
}

impl TryFrom<RawFileEvent> for FileEvent {
    type Error = String;

    fn try_from(raw: RawFileEvent) -> Result<Self, Self::Error> {
        match raw {
            RawFileEvent::FileAdded { file_id, file } => {
                check_file_id(&file_id, &file)?;
                Ok(Self::FileAdded { file_id, file })
            }
            RawFileEvent::FileUpdated { file_id, file } => {
                check_file_id(&file_id, &file)?;
                Ok(Self::FileUpdated { file_id, file })
            }
            RawFileEvent::FileRemoved { file_id } => Ok(Self::FileRemoved { file_id }),
        }
    }
}

fn check_file_id(file_id: &str, file: &FileSummary) -> Result<(), String> {
    if file_id == file.id {
        Ok(())
    } else {
        Err(format!(
            "fileId '{}' does not match file.id '{}'",
            file_id, file.id
        ))
    }
}

/// The event type tag, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FileAdded,
    FileUpdated,
    FileRemoved,
}

impl FileEvent {
    pub fn added(file: FileSummary) -> Self {
        Self::FileAdded {
            file_id: file.id.clone(),
            file,
        }
    }

    pub fn updated(file: FileSummary) -> Self {
        Self::FileUpdated {
            file_id: file.id.clone(),
            file,
        }
    }

    pub fn removed(file_id: impl Into<String>) -> Self {
        Self::FileRemoved {
            file_id: file_id.into(),
        }
    }

    pub fn file_id(&self) -> &str {
        match self {
            Self::FileAdded { file_id, .. }
            | Self::FileUpdated { file_id, .. }
            | Self::FileRemoved { file_id } => file_id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::FileAdded { .. } => EventKind::FileAdded,
            Self::FileUpdated { .. } => EventKind::FileUpdated,
            Self::FileRemoved { .. } => EventKind::FileRemoved,
        }
    }

    /// The file summary carried by the event, if any.
    pub fn file(&self) -> Option<&FileSummary> {
        match self {
            Self::FileAdded { file, .. } | Self::FileUpdated { file, .. } => Some(file),
            Self::FileRemoved { .. } => None,
        }
    }
}

impl EventKind {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileAdded => "file-added",
            Self::FileUpdated => "file-updated",
            Self::FileRemoved => "file-removed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
