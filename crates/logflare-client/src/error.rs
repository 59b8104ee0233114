//! Error types for the Logflare API client.

/// The call could not be completed, or its response could not be read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, timeout, TLS or body read failure
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Response body is not the expected JSON document
    #[error("response body could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured host cannot carry path segments
    #[error("host URL cannot be used as a base for API paths")]
    InvalidBaseUrl,
}

// Request URLs embed identity tokens, so they are stripped before the error
// can be rendered anywhere.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// Invalid client configuration, reported before any call is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no access token configured; set LOGFLARE_ACCESS_TOKEN or pass --access-token")]
    MissingAccessToken,

    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
