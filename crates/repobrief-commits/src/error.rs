//! Error types for repobrief-commits.

use repobrief_github::GithubError;
use repobrief_store::StoreError;

/// Errors that abort a commit poll.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The project is unknown or has no repository url.
    #[error("project {0} has no repository url")]
    ProjectMissingRepository(String),

    /// Invalid repository URL or the commit list could not be fetched.
    #[error("repository error: {0}")]
    Host(#[from] GithubError),

    /// Reading known hashes or inserting the batch failed.
    #[error("database error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using `CommitError`.
pub type Result<T> = std::result::Result<T, CommitError>;
