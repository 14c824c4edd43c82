//! Publish file events to a running server.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use filehub_core::{FileEvent, FileSummary, LiveNotifier};

#[derive(Args)]
pub struct NotifyArgs {
    /// Base URL of the running server
    #[arg(long, env = "FILEHUB_URL", default_value = "http://127.0.0.1:3000")]
    pub url: String,

    #[command(subcommand)]
    pub event: NotifyEvent,
}

#[derive(Subcommand)]
pub enum NotifyEvent {
    /// A file was uploaded
    Added(FileArgs),

    /// A file's description or visibility changed
    Updated(FileArgs),

    /// A file was deleted
    Removed {
        /// File ID
        file_id: String,
    },
}

#[derive(Args)]
pub struct FileArgs {
    /// File ID
    pub id: String,

    /// Original file name
    #[arg(long)]
    pub name: String,

    /// Size in bytes
    #[arg(long, default_value = "0")]
    pub size: u64,

    /// File type (image, video, pdf, text, ...)
    #[arg(long, default_value = "other")]
    pub extension: String,

    /// Uploader's user ID
    #[arg(long)]
    pub owner: String,

    /// Share link (defaults to /share?id=<ID>)
    #[arg(long)]
    pub share_url: Option<String>,

    /// File description
    #[arg(long)]
    pub description: Option<String>,

    /// Whether the file is publicly listed
    #[arg(long)]
    pub public: bool,
}

impl FileArgs {
    fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self
                .share_url
                .clone()
                .unwrap_or_else(|| format!("/share?id={}", self.id)),
            size: self.size,
            extension: self.extension.clone(),
            description: self.description.clone(),
            public: self.public,
            uploaded_by_id: self.owner.clone(),
            created_at: Some(chrono::Utc::now()),
        }
    }
}

impl NotifyArgs {
    pub fn event(&self) -> FileEvent {
        match &self.event {
            NotifyEvent::Added(file) => FileEvent::added(file.summary()),
            NotifyEvent::Updated(file) => FileEvent::updated(file.summary()),
            NotifyEvent::Removed { file_id } => FileEvent::removed(file_id.as_str()),
        }
    }
}

pub async fn execute(args: NotifyArgs) -> Result<()> {
    let event = args.event();
    let notifier = LiveNotifier::with_url(&args.url);

    if !notifier.send(&event).await {
        bail!("server at {} did not accept the event", notifier.base_url());
    }

    println!(
        "{} {} {}",
        "✓".green(),
        event.kind().to_string().bold(),
        event.file_id()
    );
    Ok(())
}
