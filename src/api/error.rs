//! Errors produced by the posts API client.

use serde_json::Value;
use thiserror::Error;

/// HTTP status used by the server for field validation failures.
pub const VALIDATION_STATUS: u16 = 422;

/// Errors that can occur while talking to the posts API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or body transfer failure.
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: Value },

    /// A 2xx response whose body is not what the endpoint promises.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request body that could not be serialized to JSON.
    #[error("Failed to encode request body for '{url}': {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status() == Some(VALIDATION_STATUS)
    }

    /// Short machine-readable category for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Transport { source, .. } if source.is_timeout() => "timeout",
            ApiError::Transport { .. } => "transport_error",
            ApiError::Status { .. } => "status_error",
            ApiError::Decode { .. } => "decode_error",
            ApiError::Encode { .. } => "encode_error",
            ApiError::InvalidUrl { .. } => "invalid_url",
        }
    }
}
