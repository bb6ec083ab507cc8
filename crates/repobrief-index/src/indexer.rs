//! Project indexing orchestrator: load → summarize → embed → store.

use std::time::{Duration, Instant};

use repobrief_github::{IgnoreList, RepoFile, RepoHost};
use repobrief_llm::provider::LlmProvider;
use repobrief_llm::retry::RetryPolicy;
use repobrief_store::SqliteStore;
use serde::Serialize;

use crate::embedding::embed_summary;
use crate::error::{IndexError, Result};
use crate::loader::ContentLoader;
use crate::summarizer::CodeSummarizer;
use crate::writer::EmbeddingWriter;

/// Indexer configuration.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Pause between consecutive files, never after the last one.
    pub pacing: Duration,
    pub retry: RetryPolicy,
    /// Upper bound for a single model call.
    pub llm_timeout: Duration,
    pub ignore: IgnoreList,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(4),
            retry: RetryPolicy::default(),
            llm_timeout: Duration::from_secs(60),
            ignore: IgnoreList::defaults(),
        }
    }
}

/// A summarized, embedded file ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedFile {
    pub file_name: String,
    pub source_code: String,
    pub summary: String,
    pub embedding: Vec<f32>,
}

/// Summary of an indexing run.
///
/// `results` has one slot per loaded file, in load order; `None` marks a file
/// whose summary could not be produced.
#[derive(Debug, Default, Serialize)]
pub struct IndexReport {
    pub files_loaded: usize,
    pub files_summarized: usize,
    pub files_stored: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
    #[serde(skip)]
    pub results: Vec<Option<IndexedFile>>,
}

/// Orchestrates indexing of one repository into one project.
pub struct CodeIndexer<H, P> {
    loader: ContentLoader<H>,
    summarizer: CodeSummarizer<P>,
    writer: EmbeddingWriter,
    pacing: Duration,
}

impl<H: RepoHost, P: LlmProvider> CodeIndexer<H, P> {
    #[must_use]
    pub fn new(host: H, provider: P, store: SqliteStore, config: IndexerConfig) -> Self {
        Self {
            loader: ContentLoader::new(host, config.ignore),
            summarizer: CodeSummarizer::new(provider)
                .with_retry(config.retry)
                .with_timeout(config.llm_timeout),
            writer: EmbeddingWriter::new(store),
            pacing: config.pacing,
        }
    }

    /// Index every file of `repo_url` into `project_id`.
    ///
    /// Re-running appends a fresh set of records; existing ones are kept.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Connectivity`] if the store is unreachable, or
    /// [`IndexError::Host`] if the URL is invalid or the repository cannot be
    /// listed. Per-file failures are reported in [`IndexReport::errors`].
    pub async fn index_project(
        &self,
        project_id: &str,
        repo_url: &str,
        token: Option<&str>,
    ) -> Result<IndexReport> {
        let start = Instant::now();
        let mut report = IndexReport::default();

        self.writer
            .store()
            .ping()
            .await
            .map_err(IndexError::Connectivity)?;

        let files = self.loader.load(repo_url, token).await?;
        let total = files.len();
        report.files_loaded = total;
        tracing::info!(project_id, total, "indexing started");

        self.summarize_files(files, &mut report).await;

        let outcomes = self
            .writer
            .write_all(project_id, report.results.iter().flatten())
            .await;
        let mut write_errors = Vec::new();
        for (file_name, outcome) in outcomes {
            match outcome {
                Ok(_) => report.files_stored += 1,
                Err(e) => write_errors.push(format!("{file_name}: {e}")),
            }
        }
        report.errors.extend(write_errors);

        report.duration_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        tracing::info!(
            project_id,
            loaded = report.files_loaded,
            summarized = report.files_summarized,
            stored = report.files_stored,
            errors = report.errors.len(),
            duration_ms = report.duration_ms,
            "indexing finished"
        );
        Ok(report)
    }

    /// Summarize and embed `files` one at a time, sleeping `pacing` between
    /// consecutive files. Pushes one result slot per file.
    async fn summarize_files(&self, files: Vec<RepoFile>, report: &mut IndexReport) {
        let total = files.len();
        report.results.reserve(total);
        for (i, file) in files.into_iter().enumerate() {
            let summary = self.summarizer.summarize(&file).await;
            if summary.is_empty() {
                report.errors.push(format!("{}: no summary", file.path));
                report.results.push(None);
            } else {
                let embedding = embed_summary(&summary);
                tracing::info!(
                    file = %file.path,
                    progress = format_args!("{}/{total}", i + 1),
                    summary_len = summary.len(),
                );
                report.files_summarized += 1;
                report.results.push(Some(IndexedFile {
                    file_name: file.path,
                    source_code: file.content,
                    summary,
                    embedding,
                }));
            }

            if i + 1 < total && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }
    }
}
