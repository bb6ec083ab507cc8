use std::future::Future;

use serde::Serialize;

use crate::error::GithubError;
use crate::ignore::IgnoreList;
use crate::slug::RepoSlug;

/// Where a loaded file came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub source: String,
    pub repository: String,
    pub branch: String,
    pub sha: String,
    pub size: u64,
}

/// One text file loaded from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub path: String,
    pub content: String,
    pub metadata: FileMetadata,
}

/// Commit metadata as reported by the host. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteCommit {
    pub hash: String,
    pub message: String,
    pub author_name: String,
    pub author_avatar: String,
    pub date: String,
}

/// Remote repository access used by both ingestion pipelines.
pub trait RepoHost: Send + Sync {
    /// Load every text file of the repository that the ignore list does not exclude.
    ///
    /// # Errors
    ///
    /// Fails as a whole only when the URL is invalid or the file tree cannot be
    /// listed; per-file failures are logged and the file is omitted.
    fn list_repository_files(
        &self,
        repo_url: &str,
        token: Option<&str>,
        ignore: &IgnoreList,
    ) -> impl Future<Output = Result<Vec<RepoFile>, GithubError>> + Send;

    /// List the repository's commits in host order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn list_commits(
        &self,
        slug: &RepoSlug,
    ) -> impl Future<Output = Result<Vec<RemoteCommit>, GithubError>> + Send;

    /// Fetch the unified diff of one commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the commit cannot be fetched.
    fn fetch_commit_diff(
        &self,
        repo_url: &str,
        commit_hash: &str,
    ) -> impl Future<Output = Result<String, GithubError>> + Send;
}

impl<H: RepoHost> RepoHost for std::sync::Arc<H> {
    async fn list_repository_files(
        &self,
        repo_url: &str,
        token: Option<&str>,
        ignore: &IgnoreList,
    ) -> Result<Vec<RepoFile>, GithubError> {
        self.as_ref()
            .list_repository_files(repo_url, token, ignore)
            .await
    }

    async fn list_commits(&self, slug: &RepoSlug) -> Result<Vec<RemoteCommit>, GithubError> {
        self.as_ref().list_commits(slug).await
    }

    async fn fetch_commit_diff(
        &self,
        repo_url: &str,
        commit_hash: &str,
    ) -> Result<String, GithubError> {
        self.as_ref().fetch_commit_diff(repo_url, commit_hash).await
    }
}
