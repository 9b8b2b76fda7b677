//! Search-history endpoints for the backend client.

use partfinder_core::{ClearHistoryResponse, HistoryResponse};

use crate::client::PartfinderClient;
use crate::error::ClientError;

impl PartfinderClient {
    /// Fetches the most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on non-2xx (the backend rejects
    ///   limits above its configured maximum with 422).
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn get_history(&self, limit: u32) -> Result<HistoryResponse, ClientError> {
        let mut url = self.endpoint(&["api", "history"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        tracing::debug!(%url, "fetching search history");
        self.send_json(self.client().get(url), &format!("history(limit={limit})"))
            .await
    }

    /// Deletes every history entry.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn clear_history(&self) -> Result<ClearHistoryResponse, ClientError> {
        let url = self.endpoint(&["api", "history"])?;
        tracing::debug!(%url, "clearing search history");
        self.send_json(self.client().delete(url), "clear_history")
            .await
    }
}
