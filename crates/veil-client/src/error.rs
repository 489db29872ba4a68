//! Promotion server client error types.

use thiserror::Error;

/// Errors from promotion server calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// Underlying transport failure.
        source: reqwest::Error,
    },

    /// The server returned a non-success status.
    #[error("promotion server {endpoint} returned {status}: {body}")]
    Api {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// The server accepted the claim but has not signed the batch yet
    /// (HTTP 202). Retry after a delay.
    #[error("credentials not ready yet at {endpoint}")]
    NotReady {
        /// Endpoint path the request targeted.
        endpoint: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// Underlying decode failure.
        source: reqwest::Error,
    },

    /// Request body serialization failed.
    #[error("failed to encode request for {endpoint}: {source}")]
    Encode {
        /// Endpoint path the request targeted.
        endpoint: String,
        /// Underlying encode failure.
        source: serde_json::Error,
    },

    /// Client configuration error.
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The transport's retry classification.
    ///
    /// Transient conditions — connection failures, server errors (5xx),
    /// throttling (429), and the credentials-not-ready signal — are
    /// retryable. Client-side rejections (other 4xx) and undecodable
    /// responses are not: retrying them without intervention cannot
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } | Self::NotReady { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Deserialization { .. } | Self::Encode { .. } | Self::Config(_) => false,
        }
    }
}
