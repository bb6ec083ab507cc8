use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use repobrief_github::RepoHost;
use repobrief_llm::provider::LlmProvider;
use repobrief_store::{NewCommit, SqliteStore};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::collector::CommitCollector;
use crate::dedup::unprocessed_commits;
use crate::error::{CommitError, Result};
use crate::summarizer::CommitSummarizer;

/// Outcome of one poll.
#[derive(Debug, Default, Serialize)]
pub struct PollReport {
    /// Commits returned by the collector (at most 15).
    pub fetched: usize,
    /// Commits inserted, in newest-first order, with their summaries.
    pub commits: Vec<NewCommit>,
    /// Rows actually written; lower than `commits.len()` only under a concurrent poll.
    pub inserted: usize,
    pub duration_ms: u64,
}

/// Keeps a project's commit log in sync with its repository.
pub struct CommitPoller<H, P> {
    collector: CommitCollector<H>,
    summarizer: CommitSummarizer<H, P>,
    store: SqliteStore,
}

impl<H: RepoHost + Clone, P: LlmProvider> CommitPoller<H, P> {
    #[must_use]
    pub fn new(host: H, provider: P, store: SqliteStore, llm_timeout: Duration) -> Self {
        Self {
            collector: CommitCollector::new(host.clone()),
            summarizer: CommitSummarizer::new(host, provider).with_timeout(llm_timeout),
            store,
        }
    }

    /// Fetch, deduplicate, summarize and store new commits of `project_id`.
    ///
    /// Every new commit gets a row; a commit whose diff or summary failed is
    /// stored with an empty summary.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::ProjectMissingRepository`] if the project has no
    /// repository URL, [`CommitError::Host`] if the URL is invalid or the commit
    /// list cannot be fetched, and [`CommitError::Store`] if reading hashes or the
    /// bulk insert fails.
    pub async fn poll(&self, project_id: &str) -> Result<PollReport> {
        let start = Instant::now();
        let repo = self
            .store
            .get_project_repository(project_id)
            .await?
            .ok_or_else(|| CommitError::ProjectMissingRepository(project_id.to_owned()))?;

        let recent = self.collector.recent_commits(&repo.github_url).await?;
        let fetched = recent.len();
        let fresh = unprocessed_commits(&self.store, project_id, recent).await?;
        tracing::info!(project_id, fetched, new = fresh.len(), "polling commits");

        let summaries = join_all(
            fresh
                .iter()
                .map(|c| self.summarizer.summarize(&repo.github_url, &c.hash)),
        )
        .await;

        let commits: Vec<NewCommit> = fresh
            .into_iter()
            .zip(summaries)
            .map(|(c, summary)| NewCommit {
                hash: c.hash,
                message: c.message,
                author_name: c.author_name,
                author_avatar: c.author_avatar,
                date: c.date,
                summary,
            })
            .collect();

        let inserted = self.store.create_commit_records(project_id, &commits).await?;
        let duration_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        tracing::info!(project_id, inserted, duration_ms, "commit poll finished");

        Ok(PollReport {
            fetched,
            commits,
            inserted,
            duration_ms,
        })
    }
}

impl<H, P> CommitPoller<H, P>
where
    H: RepoHost + Clone + 'static,
    P: LlmProvider + 'static,
{
    /// Run [`poll`](Self::poll) in the background. The result is discarded;
    /// failures are logged.
    pub fn spawn_poll(self: Arc<Self>, project_id: String) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.poll(&project_id).await {
                Ok(report) => {
                    tracing::debug!(project_id = %project_id, inserted = report.inserted, "background poll done");
                }
                Err(e) => tracing::error!(project_id = %project_id, "background commit poll failed: {e}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use repobrief_github::{GithubError, IgnoreList, RemoteCommit, RepoFile, RepoSlug};
    use repobrief_llm::mock::{MockProvider, MockReply};

    use super::*;

    #[derive(Default)]
    struct FakeHost {
        commits: Vec<RemoteCommit>,
        failing_diffs: Vec<String>,
        diff_requests: Mutex<Vec<String>>,
    }

    impl RepoHost for FakeHost {
        async fn list_repository_files(
            &self,
            _repo_url: &str,
            _token: Option<&str>,
            _ignore: &IgnoreList,
        ) -> std::result::Result<Vec<RepoFile>, GithubError> {
            Ok(Vec::new())
        }

        async fn list_commits(
            &self,
            _slug: &RepoSlug,
        ) -> std::result::Result<Vec<RemoteCommit>, GithubError> {
            Ok(self.commits.clone())
        }

        async fn fetch_commit_diff(
            &self,
            _repo_url: &str,
            commit_hash: &str,
        ) -> std::result::Result<String, GithubError> {
            self.diff_requests
                .lock()
                .unwrap()
                .push(commit_hash.to_owned());
            if self.failing_diffs.iter().any(|h| h == commit_hash) {
                return Err(GithubError::Url(format!("no commit {commit_hash}")));
            }
            Ok(format!("diff for {commit_hash}"))
        }
    }

    fn remote(hash: &str, day: u32) -> RemoteCommit {
        RemoteCommit {
            hash: hash.into(),
            message: format!("msg {hash}"),
            author_name: "Ann".into(),
            author_avatar: "https://avatars/ann".into(),
            date: format!("2024-01-{day:02}T00:00:00Z"),
        }
    }

    fn stored(hash: &str) -> NewCommit {
        NewCommit {
            hash: hash.into(),
            message: String::new(),
            author_name: String::new(),
            author_avatar: String::new(),
            date: String::new(),
            summary: "old".into(),
        }
    }

    async fn store_with_project(url: &str) -> (SqliteStore, String) {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let project = store.create_project("widgets", url, None).await.unwrap();
        (store, project.id)
    }

    fn poller(host: FakeHost, mock: MockProvider, store: SqliteStore) -> CommitPoller<Arc<FakeHost>, MockProvider> {
        CommitPoller::new(Arc::new(host), mock, store, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn inserts_only_new_commits_newest_first() {
        let (store, pid) = store_with_project("https://github.com/acme/widgets").await;
        store
            .create_commit_records(&pid, &[stored("c1"), stored("c3"), stored("c5")])
            .await
            .unwrap();

        let host = FakeHost {
            commits: vec![
                remote("c1", 1),
                remote("c2", 2),
                remote("c3", 3),
                remote("c4", 4),
                remote("c5", 5),
            ],
            ..FakeHost::default()
        };
        let report = poller(host, MockProvider::default(), store.clone())
            .poll(&pid)
            .await
            .unwrap();

        assert_eq!(report.fetched, 5);
        assert_eq!(report.inserted, 2);
        let new: Vec<_> = report.commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(new, ["c4", "c2"]);

        let hashes = store.list_commit_hashes(&pid).await.unwrap();
        assert_eq!(hashes, ["c1", "c3", "c5", "c4", "c2"]);
    }

    #[tokio::test]
    async fn failed_diff_still_stores_commit() {
        let (store, pid) = store_with_project("https://github.com/acme/widgets").await;
        let host = FakeHost {
            commits: vec![remote("c1", 1), remote("c2", 2), remote("c3", 3)],
            failing_diffs: vec!["c2".into()],
            ..FakeHost::default()
        };
        let mock = MockProvider::default()
            .when_prompt_contains("diff for c1", vec![MockReply::Text("one".into())])
            .when_prompt_contains("diff for c3", vec![MockReply::Text("three".into())]);

        let report = poller(host, mock, store.clone()).poll(&pid).await.unwrap();
        assert_eq!(report.inserted, 3);

        let rows = store.list_commits(&pid).await.unwrap();
        let pairs: Vec<_> = rows
            .iter()
            .map(|r| (r.commit_hash.as_str(), r.summary.as_str()))
            .collect();
        assert_eq!(pairs, [("c3", "three"), ("c2", ""), ("c1", "one")]);
        assert_eq!(rows[0].commit_message, "msg c3");
        assert_eq!(rows[0].commit_author_avatar, "https://avatars/ann");
    }

    #[tokio::test]
    async fn model_failure_stores_empty_summary() {
        let (store, pid) = store_with_project("https://github.com/acme/widgets").await;
        let host = FakeHost {
            commits: vec![remote("c1", 1)],
            ..FakeHost::default()
        };
        let report = poller(host, MockProvider::failing(), store.clone())
            .poll(&pid)
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.commits[0].summary, "");
    }

    #[tokio::test]
    async fn second_poll_inserts_nothing() {
        let (store, pid) = store_with_project("https://github.com/acme/widgets").await;
        let host = Arc::new(FakeHost {
            commits: vec![remote("c1", 1), remote("c2", 2)],
            ..FakeHost::default()
        });
        let poller = CommitPoller::new(
            Arc::clone(&host),
            MockProvider::default(),
            store,
            Duration::from_secs(60),
        );

        assert_eq!(poller.poll(&pid).await.unwrap().inserted, 2);
        let again = poller.poll(&pid).await.unwrap();
        assert_eq!(again.inserted, 0);
        assert!(again.commits.is_empty());
        assert_eq!(host.diff_requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_project_is_reported() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let err = poller(FakeHost::default(), MockProvider::default(), store)
            .poll("nope")
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::ProjectMissingRepository(id) if id == "nope"));
    }

    #[tokio::test]
    async fn empty_repository_url_is_reported() {
        let (store, pid) = store_with_project("").await;
        let err = poller(FakeHost::default(), MockProvider::default(), store)
            .poll(&pid)
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::ProjectMissingRepository(_)));
    }

    #[tokio::test]
    async fn invalid_url_is_fatal() {
        let (store, pid) = store_with_project("widgets").await;
        let err = poller(FakeHost::default(), MockProvider::default(), store)
            .poll(&pid)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommitError::Host(GithubError::InvalidRepositoryUrl(_))
        ));
    }

    #[tokio::test]
    async fn spawn_poll_runs_in_background() {
        let (store, pid) = store_with_project("https://github.com/acme/widgets").await;
        let host = FakeHost {
            commits: vec![remote("c1", 1)],
            ..FakeHost::default()
        };
        let poller = Arc::new(poller(host, MockProvider::default(), store.clone()));

        poller.spawn_poll(pid.clone()).await.unwrap();
        assert_eq!(store.list_commit_hashes(&pid).await.unwrap(), ["c1"]);
    }

    #[tokio::test]
    async fn spawn_poll_swallows_errors() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let poller = Arc::new(poller(FakeHost::default(), MockProvider::default(), store));
        assert!(poller.spawn_poll("nope".into()).await.is_ok());
    }
}
