//! SQLite persistence for repobrief.
//!
//! One [`SqliteStore`] owns the pool. Projects are parents; source-file records
//! and commit records are children removed by `ON DELETE CASCADE`.

pub mod error;
pub mod sqlite;
pub mod types;
pub mod vector;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use types::{CommitRecord, NewCommit, Project, ProjectRepository, SourceFileRecord};
pub use vector::{format_vector, parse_vector};
