//! Error types for repobrief-llm.

/// Errors raised by a language-model backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding failure.
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered HTTP 429. Retried by [`crate::retry`].
    #[error("rate limited")]
    RateLimited,

    /// The provider answered HTTP 503.
    #[error("provider unavailable")]
    Unavailable,

    /// The response carried no text.
    #[error("empty response from {provider}")]
    EmptyResponse { provider: String },

    /// The call exceeded its deadline, in seconds.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Any other non-success answer.
    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Whether the provider asked us to slow down.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Result type alias using `LlmError`.
pub type Result<T> = std::result::Result<T, LlmError>;
