use admin_types::ApiEnvelope;
use thiserror::Error;

/// Failures surfaced by [`crate::AdminClient`] and the services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid bearer token header value")]
    InvalidToken,

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", .envelope.message_text().unwrap_or_else(|| "request failed".into()))]
    Status { status: u16, envelope: ApiEnvelope },

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for server-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
