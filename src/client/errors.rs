//! # Client Errors
//!
//! Error types for calls to the CMS backend.

use thiserror::Error;

use crate::history::HistoryError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// REST client errors
#[derive(Debug, Error)]
pub enum ClientError {
    // ==================
    // Setup
    // ==================
    /// Base URL could not be parsed
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    // ==================
    // Transport
    // ==================
    /// Connection, timeout, or TLS failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    // ==================
    // Backend Responses
    // ==================
    /// Non-2xx status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx status with `success: false`
    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    /// Body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    // ==================
    // Timeline
    // ==================
    /// Reconstruction over fetched records failed
    #[error("{0}")]
    History(#[from] HistoryError),
}

impl ClientError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::InvalidBaseUrl { .. } => "CMS_CLIENT_INVALID_BASE_URL",
            ClientError::Transport(_) => "CMS_CLIENT_TRANSPORT",
            ClientError::Status { .. } => "CMS_CLIENT_STATUS",
            ClientError::Rejected(_) => "CMS_CLIENT_REJECTED",
            ClientError::Decode(_) => "CMS_CLIENT_DECODE",
            ClientError::History(inner) => inner.code(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
