//! Editing error types

use thiserror::Error;

/// Errors that can occur while sending an edit
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl EditError {
    /// Check if sending the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            EditError::Network(_) => true,
            EditError::Status { status, .. } => is_retryable_status(*status),
            EditError::InvalidRequest(_) => false,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            EditError::Status { status, .. } => Some(*status),
            EditError::Network(e) => e.status().map(|s| s.as_u16()),
            EditError::InvalidRequest(_) => None,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (500..600).contains(&status)
}
