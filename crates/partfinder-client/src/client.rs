//! HTTP client for the parts-search backend.
//!
//! Wraps `reqwest` with typed request/response bodies and maps non-2xx
//! statuses to [`ClientError`] variants. Search lives here; the history and
//! favorites endpoints are implemented in sibling modules on the same type.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use partfinder_core::{AppConfig, SearchRequest, SearchResponse};

use crate::error::ClientError;

/// Client for the parts-search REST API.
///
/// Use [`PartfinderClient::from_config`] in the binary or
/// [`PartfinderClient::new`] to point at a mock server in tests.
pub struct PartfinderClient {
    client: Client,
    base_url: Url,
}

impl PartfinderClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute `http(s)` URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Keep exactly one trailing slash so endpoint segments are appended
        // after any path prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "expected an absolute http or https URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Creates a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PartfinderClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Submits a raw query to `POST /api/search`.
    ///
    /// The query is sent trimmed. `vendors` restricts the search to the named
    /// vendors; `None` lets the backend use its default list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyQuery`] if `query` is blank (no request is sent).
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::NotFound`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the body does not match
    ///   [`SearchResponse`].
    pub async fn search(
        &self,
        query: &str,
        vendors: Option<&[String]>,
    ) -> Result<SearchResponse, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        let url = self.endpoint(&["api", "search"])?;
        let body = SearchRequest {
            query: query.to_string(),
            vendors: vendors.map(<[String]>::to_vec),
        };
        tracing::debug!(%url, query, "submitting search");

        self.send_json(self.client.post(url).json(&body), "search")
            .await
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Builds an endpoint URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request, maps non-2xx statuses to typed errors, and parses the
    /// body as JSON.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { url });
        }
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|body| error_detail(&body));
            tracing::warn!(status = status.as_u16(), %url, ?detail, "backend returned error status");
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                detail,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Extracts the `detail` message from an error body shaped like
/// `{"detail": "..."}`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
