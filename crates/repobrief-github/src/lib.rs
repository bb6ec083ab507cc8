//! Repository host access for repobrief.
//!
//! [`RepoHost`] is the seam the pipelines depend on; [`GithubClient`] implements it
//! over the GitHub REST API. Repository URLs are reduced to an owner/name
//! [`RepoSlug`] before any request is made.

pub mod client;
pub mod error;
pub mod host;
pub mod ignore;
pub mod slug;

pub use client::{GithubClient, GithubClientConfig};
pub use error::{GithubError, Result};
pub use host::{FileMetadata, RemoteCommit, RepoFile, RepoHost};
pub use ignore::IgnoreList;
pub use slug::RepoSlug;
