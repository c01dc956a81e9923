//! Question source and advisor error types.
//!
//! These errors represent failures when fetching AI-generated content.
//! Defined in `skillmatch-core` so the assessment engine can classify
//! failures without string matching on provider internals.

use thiserror::Error;

/// Errors that can occur when fetching questions or advice from a provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The payload arrived but failed schema validation. The whole payload
    /// is rejected; nothing is partially accepted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The source returned no questions for the requested domain.
    #[error("no questions returned for domain '{domain}'")]
    EmptyQuestionSet { domain: String },
}

impl FetchError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            FetchError::AuthenticationFailed(_)
                | FetchError::ModelNotFound(_)
                | FetchError::MalformedResponse(_)
                | FetchError::EmptyQuestionSet { .. }
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            FetchError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
