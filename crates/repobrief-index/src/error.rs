//! Error types for repobrief-index.

use repobrief_github::GithubError;
use repobrief_llm::LlmError;
use repobrief_store::StoreError;

/// Errors that abort an indexing run or a question.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The store did not answer the pre-flight check.
    #[error("store unreachable: {0}")]
    Connectivity(#[source] StoreError),

    /// Invalid repository URL or the file tree could not be listed.
    #[error("repository error: {0}")]
    Host(#[from] GithubError),

    /// Reading or writing indexed records failed.
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    /// The model could not answer a question.
    #[error("model error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
