use repobrief_github::{IgnoreList, RepoFile, RepoHost};

use crate::error::Result;

/// Loads the indexable files of a repository through a [`RepoHost`].
#[derive(Debug, Clone)]
pub struct ContentLoader<H> {
    host: H,
    ignore: IgnoreList,
}

impl<H: RepoHost> ContentLoader<H> {
    #[must_use]
    pub fn new(host: H, ignore: IgnoreList) -> Self {
        Self { host, ignore }
    }

    /// # Errors
    ///
    /// Returns [`IndexError::Host`](crate::IndexError::Host) if the URL is invalid
    /// or the repository tree cannot be listed.
    pub async fn load(&self, repo_url: &str, token: Option<&str>) -> Result<Vec<RepoFile>> {
        let files = self
            .host
            .list_repository_files(repo_url, token, &self.ignore)
            .await?;
        tracing::info!(repo = repo_url, files = files.len(), "repository loaded");
        Ok(files)
    }
}
