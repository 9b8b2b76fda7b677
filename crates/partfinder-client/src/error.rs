use thiserror::Error;

/// Errors returned by the parts-search backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A search was attempted with a blank query.
    #[error("search query is empty")]
    EmptyQuery,

    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx response. `detail` carries the backend's
    /// `{"detail": ...}` message when the body has one.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        detail: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
