//! Error types for repobrief-store.

/// Errors raised by [`crate::SqliteStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection, query or decoding failure.
    #[error("database error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// An embedded migration failed to apply.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No project row has the given id.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// A stored embedding is not a `[a,b,...]` literal.
    #[error("malformed embedding literal: {0}")]
    MalformedEmbedding(String),

    /// A count or row id does not fit the target integer type.
    #[error("integer conversion: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

/// Result type alias using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
