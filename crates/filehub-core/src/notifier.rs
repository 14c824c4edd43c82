//! HTTP notifier for mutation handlers running outside the web server.
//!
//! Upload, remove and update handlers call this after their durable write
//! succeeds. The server re-broadcasts the event to every open stream.
//! Failures are logged and swallowed so a mutation never fails because the
//! notification did.

use std::time::Duration;
use tracing::{debug, warn};

use crate::event::{FileEvent, FileSummary};

/// Default web server URL.
const DEFAULT_LIVE_URL: &str = "http://127.0.0.1:3000";

/// Notifies the web server of file mutations via HTTP.
#[derive(Clone)]
pub struct LiveNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl LiveNotifier {
    /// Create a new notifier with default settings.
    ///
    /// Uses the `FILEHUB_URL` environment variable if set,
    /// otherwise defaults to `http://127.0.0.1:3000`.
    pub fn new() -> Self {
        let base_url =
            std::env::var("FILEHUB_URL").unwrap_or_else(|_| DEFAULT_LIVE_URL.to_string());
        Self::with_url(&base_url)
    }

    /// Create a notifier with a custom base URL.
    pub fn with_url(base_url: &str) -> Self {
        debug!(base_url = %base_url, "LiveNotifier initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn file_added(&self, file: FileSummary) -> bool {
        self.send(&FileEvent::added(file)).await
    }

    pub async fn file_updated(&self, file: FileSummary) -> bool {
        self.send(&FileEvent::updated(file)).await
    }

    pub async fn file_removed(&self, file_id: &str) -> bool {
        self.send(&FileEvent::removed(file_id)).await
    }

    /// Post an event to `/internal/notify`.
    ///
    /// Returns whether the server accepted it. Never errors.
    pub async fn send(&self, event: &FileEvent) -> bool {
        let url = format!("{}/internal/notify", self.base_url);
        let kind = event.kind();
        let file_id = event.file_id();

        debug!(url = %url, %kind, file_id = %file_id, "Sending file event notification");

        match self.client.post(&url).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(%kind, file_id = %file_id, "File event notification sent successfully");
                true
            }
            Ok(response) => {
                warn!(
                    %kind,
                    file_id = %file_id,
                    status_code = %response.status(),
                    "File event notification failed with status"
                );
                false
            }
            Err(e) => {
                // Expected when the server is not running
                debug!(
                    %kind,
                    file_id = %file_id,
                    error = %e,
                    url = %url,
                    "Failed to send file event notification (filehub serve may not be running)"
                );
                false
            }
        }
    }
}

impl Default for LiveNotifier {
    fn default() -> Self {
        Self::new()
    }
}
