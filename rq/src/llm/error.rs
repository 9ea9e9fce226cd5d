//! Capability invocation errors
//!
//! Every fault of the external capability surfaces as one of these. The
//! engine does not branch on the variant - any fault burns one of the
//! item's attempts - but a rate-limit fault carries the server-requested
//! backoff, which the retry block honors before the next attempt.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single capability invocation
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// The server-requested backoff, present only on a rate-limit fault
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            LlmError::ApiError { .. } | LlmError::Network(_) | LlmError::InvalidResponse(_) => None,
        }
    }
}
