use chrono::{DateTime, FixedOffset};
use repobrief_github::{RemoteCommit, RepoHost, RepoSlug};

use crate::error::Result;

/// Newest commits kept per poll.
pub const MAX_COMMITS: usize = 15;

/// Fetches the most recent commits of a repository.
#[derive(Debug, Clone)]
pub struct CommitCollector<H> {
    host: H,
}

impl<H: RepoHost> CommitCollector<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Up to [`MAX_COMMITS`] commits, newest author date first.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::Host`](crate::CommitError::Host) if the URL cannot be
    /// parsed or the commit list cannot be fetched.
    pub async fn recent_commits(&self, repo_url: &str) -> Result<Vec<RemoteCommit>> {
        let slug = RepoSlug::parse(repo_url)?;
        let commits = self.host.list_commits(&slug).await?;
        tracing::debug!(repo = %slug, fetched = commits.len(), "commits listed");
        Ok(newest_first(commits))
    }
}

fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(date).ok()
}

/// Sort by author date descending and keep the first [`MAX_COMMITS`].
///
/// Commits with a missing or unparsable date sort last; ties keep host order.
#[must_use]
pub fn newest_first(mut commits: Vec<RemoteCommit>) -> Vec<RemoteCommit> {
    commits.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
    commits.truncate(MAX_COMMITS);
    commits
}
