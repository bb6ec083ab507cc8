//! Project-level operations over both pipelines.

use std::sync::Arc;

use anyhow::Context;
use repobrief_commits::{CommitPoller, PollReport};
use repobrief_github::RepoHost;
use repobrief_index::{Answer, CodeIndexer, CodeRetriever, IndexReport, IndexerConfig};
use repobrief_llm::provider::LlmProvider;
use repobrief_store::{CommitRecord, Project, SourceFileRecord, SqliteStore};
use tokio::task::JoinHandle;

/// Result of creating a project: the row plus the first index and poll runs.
#[derive(Debug)]
pub struct ProjectSummary {
    pub project: Project,
    pub index: IndexReport,
    pub poll: PollReport,
}

/// Stored commits plus the background refresh started by the read, if any.
#[derive(Debug)]
pub struct CommitsView {
    pub commits: Vec<CommitRecord>,
    pub refresh: Option<JoinHandle<()>>,
}

pub struct ProjectService<H, P> {
    store: SqliteStore,
    indexer: CodeIndexer<H, P>,
    retriever: CodeRetriever<P>,
    poller: Arc<CommitPoller<H, P>>,
    refresh_on_read: bool,
}

impl<H, P> ProjectService<H, P>
where
    H: RepoHost + Clone + 'static,
    P: LlmProvider + Clone + 'static,
{
    #[must_use]
    pub fn new(
        host: H,
        provider: P,
        store: SqliteStore,
        config: IndexerConfig,
        refresh_on_read: bool,
    ) -> Self {
        let llm_timeout = config.llm_timeout;
        Self {
            poller: Arc::new(CommitPoller::new(
                host.clone(),
                provider.clone(),
                store.clone(),
                llm_timeout,
            )),
            retriever: CodeRetriever::new(provider.clone(), store.clone(), llm_timeout),
            indexer: CodeIndexer::new(host, provider, store.clone(), config),
            store,
            refresh_on_read,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Create a project, index its files and poll its commits.
    ///
    /// Both runs complete before this returns. If either fails fatally the
    /// project row is kept and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert, the indexing run or the commit poll fails.
    pub async fn create_project(
        &self,
        name: &str,
        github_url: &str,
        github_token: Option<&str>,
    ) -> anyhow::Result<ProjectSummary> {
        let project = self
            .store
            .create_project(name, github_url, github_token)
            .await
            .context("failed to create project")?;
        tracing::info!(project_id = %project.id, name, github_url, "project created");

        let index = self
            .indexer
            .index_project(&project.id, github_url, github_token)
            .await
            .with_context(|| format!("failed to index project {}", project.id))?;
        let poll = self
            .poller
            .poll(&project.id)
            .await
            .with_context(|| format!("failed to poll commits of project {}", project.id))?;

        Ok(ProjectSummary {
            project,
            index,
            poll,
        })
    }

    /// Re-index an existing project. New records are appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the project has no repository or indexing fails fatally.
    pub async fn index(&self, project_id: &str) -> anyhow::Result<IndexReport> {
        let repo = self
            .store
            .get_project_repository(project_id)
            .await?
            .with_context(|| format!("project {project_id} has no repository url"))?;
        let report = self
            .indexer
            .index_project(project_id, &repo.github_url, repo.github_token.as_deref())
            .await?;
        Ok(report)
    }

    /// # Errors
    ///
    /// Returns an error if the poll fails fatally.
    pub async fn poll(&self, project_id: &str) -> anyhow::Result<PollReport> {
        Ok(self.poller.poll(project_id).await?)
    }

    /// Stored commits of a project; starts a background poll when enabled.
    ///
    /// The returned list does not wait for that poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or the query fails.
    pub async fn commits(&self, project_id: &str) -> anyhow::Result<CommitsView> {
        self.require_project(project_id).await?;
        let refresh = self
            .refresh_on_read
            .then(|| Arc::clone(&self.poller).spawn_poll(project_id.to_owned()));
        let commits = self.store.list_commits(project_id).await?;
        Ok(CommitsView { commits, refresh })
    }

    /// # Errors
    ///
    /// Returns an error if the project does not exist or the query fails.
    pub async fn files(&self, project_id: &str) -> anyhow::Result<Vec<SourceFileRecord>> {
        self.require_project(project_id).await?;
        Ok(self.store.list_source_files(project_id).await?)
    }

    /// Answer `question` from the `top_k` indexed files closest to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist, its files cannot be read
    /// or the model call fails.
    pub async fn ask(&self, project_id: &str, question: &str, top_k: usize) -> anyhow::Result<Answer> {
        self.require_project(project_id).await?;
        self.retriever
            .ask(project_id, question, top_k)
            .await
            .with_context(|| format!("failed to answer question for project {project_id}"))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn projects(&self) -> anyhow::Result<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    /// Delete a project and everything indexed for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or the delete fails.
    pub async fn delete(&self, project_id: &str) -> anyhow::Result<()> {
        self.store.delete_project(project_id).await?;
        tracing::info!(project_id, "project deleted");
        Ok(())
    }

    async fn require_project(&self, project_id: &str) -> anyhow::Result<Project> {
        self.store
            .get_project(project_id)
            .await?
            .with_context(|| format!("project {project_id} not found"))
    }
}
