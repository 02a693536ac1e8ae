//! Network error types for coordinator calls.

use thiserror::Error;

/// Errors that can occur while talking to the coordinator
#[derive(Debug, Error)]
pub enum NetError {
    /// Request could not be built or sent
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Coordinator rejected the caller's identity (401/403)
    #[error("Unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Coordinator answered with any other non-success status
    #[error("Coordinator returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl NetError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Build from an HTTP status and body.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status, body },
            _ => Self::Status { status, body },
        }
    }
}

/// Result type for coordinator operations
pub type NetResult<T> = Result<T, NetError>;
