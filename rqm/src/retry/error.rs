//! Retry error types

use thiserror::Error;

/// Final failure of a retried request
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("Gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    #[error("Not retryable (attempt {attempts}): {source}")]
    NotRetryable { attempts: u32, source: E },

    #[error("Request abandoned before completion")]
    Abandoned,
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::NotRetryable { attempts, .. } => Some(*attempts),
            RetryError::Abandoned => None,
        }
    }

    /// The error returned by the last attempt
    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NotRetryable { source, .. } => Some(source),
            RetryError::Abandoned => None,
        }
    }

    pub fn into_last_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NotRetryable { source, .. } => Some(source),
            RetryError::Abandoned => None,
        }
    }
}
