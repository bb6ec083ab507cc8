//! Error types for repobrief-github.

/// Errors raised while talking to the repository host.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// The URL does not end in `<owner>/<repo>`.
    #[error("invalid repository url: {0}")]
    InvalidRepositoryUrl(String),

    /// An ignore pattern failed to compile.
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// JSON decoding failure.
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction failure.
    #[error("invalid API url: {0}")]
    Url(String),
}

/// Result type alias using `GithubError`.
pub type Result<T> = std::result::Result<T, GithubError>;
