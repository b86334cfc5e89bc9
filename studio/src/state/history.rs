//! Generation history panel.
//!
//! The list is fetched only when the panel opens, and again on each reopen.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::error::StudioError;
use crate::net::client::ApiClient;
use crate::net::images::HISTORY_LIMIT;
use crate::net::types::GenerationEntry;

#[derive(Debug, Clone, Default)]
pub struct HistoryPanel {
    pub open: bool,
    pub loading: bool,
    pub entries: Vec<GenerationEntry>,
    pub error: Option<String>,
}

impl HistoryPanel {
    /// Flip visibility. Returns `true` when the caller should now fetch.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Toggle, fetching the latest entries when the panel ends up open.
    ///
    /// # Errors
    ///
    /// The fetch error, which is also kept in [`HistoryPanel::error`].
    pub async fn toggle_and_load(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        if self.toggle() {
            self.load(client).await
        } else {
            Ok(())
        }
    }

    /// Fetch the newest [`HISTORY_LIMIT`] entries.
    ///
    /// # Errors
    ///
    /// Transport or status errors; previous entries are kept.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        self.loading = true;
        self.error = None;
        let result = client.history(HISTORY_LIMIT).await;
        self.loading = false;
        match result {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "history loaded");
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    /// Download the file behind one entry.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown id; download errors otherwise.
    pub async fn fetch_file(&self, client: &ApiClient, id: &str) -> Result<crate::file::LocalFile, StudioError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| StudioError::validation(format!("No history entry {id}")))?;
        client
            .download(&entry.file_url, &crate::file::timestamped_name(&entry.mode))
            .await
    }
}
