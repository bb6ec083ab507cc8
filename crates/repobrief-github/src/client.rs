use futures::stream::{self, StreamExt};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::error::{GithubError, Result};
use crate::host::{FileMetadata, RemoteCommit, RepoFile, RepoHost};
use crate::ignore::IgnoreList;
use crate::slug::RepoSlug;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

/// Loader settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// Base URL of the REST API. Overridden in tests.
    pub api_url: String,
    /// Branch (or any ref) the file tree is read from.
    pub branch: String,
    /// Upper bound on simultaneous content fetches.
    pub max_concurrency: usize,
    /// Token used when a call does not supply its own.
    pub default_token: Option<String>,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            api_url: GITHUB_API_URL.to_owned(),
            branch: "main".to_owned(),
            max_concurrency: 5,
            default_token: None,
        }
    }
}

/// GitHub REST API implementation of [`RepoHost`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubClientConfig,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    sha: String,
    #[serde(default)]
    size: u64,
}

#[derive(Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
    author: Option<ApiUser>,
}

#[derive(Deserialize)]
struct ApiCommitDetail {
    message: Option<String>,
    author: Option<ApiGitAuthor>,
}

#[derive(Deserialize)]
struct ApiGitAuthor {
    name: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct ApiUser {
    avatar_url: Option<String>,
}

impl From<ApiCommit> for RemoteCommit {
    fn from(c: ApiCommit) -> Self {
        let (author_name, date) = c
            .commit
            .author
            .map(|a| (a.name.unwrap_or_default(), a.date.unwrap_or_default()))
            .unwrap_or_default();
        Self {
            hash: c.sha,
            message: c.commit.message.unwrap_or_default(),
            author_name,
            author_avatar: c.author.and_then(|u| u.avatar_url).unwrap_or_default(),
            date,
        }
    }
}

impl GithubClient {
    #[must_use]
    pub fn new(http: reqwest::Client, mut config: GithubClientConfig) -> Self {
        while config.api_url.ends_with('/') {
            config.api_url.pop();
        }
        config.max_concurrency = config.max_concurrency.max(1);
        Self { http, config }
    }

    #[must_use]
    pub fn config(&self) -> &GithubClientConfig {
        &self.config
    }

    fn api_url(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.api_url)
            .map_err(|e| GithubError::Url(format!("{}: {e}", self.config.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| GithubError::Url(self.config.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        url: reqwest::Url,
        accept: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header(ACCEPT, accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = token.or(self.config.default_token.as_deref())
            && !token.is_empty()
        {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status,
                url: resp.url().to_string(),
            });
        }
        Ok(resp)
    }

    async fn list_blobs(&self, slug: &RepoSlug, token: Option<&str>) -> Result<Vec<TreeEntry>> {
        let mut url = self.api_url(&[
            "repos",
            &slug.owner,
            &slug.repo,
            "git",
            "trees",
            &self.config.branch,
        ])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let body = self
            .send(self.request(url, JSON_MEDIA_TYPE, token))
            .await?
            .text()
            .await?;
        let tree: TreeResponse = serde_json::from_str(&body)?;
        if tree.truncated {
            tracing::warn!(repo = %slug, "file tree truncated by host, some files will be missing");
        }
        Ok(tree.tree.into_iter().filter(|e| e.kind == "blob").collect())
    }

    async fn fetch_blob(
        &self,
        slug: &RepoSlug,
        repo_url: &str,
        entry: TreeEntry,
        token: Option<&str>,
    ) -> Option<RepoFile> {
        let mut segments = vec!["repos", slug.owner.as_str(), slug.repo.as_str(), "contents"];
        segments.extend(entry.path.split('/'));
        let mut url = match self.api_url(&segments) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(file = %entry.path, "skipping file: {e}");
                return None;
            }
        };
        url.query_pairs_mut().append_pair("ref", &self.config.branch);

        let bytes = match self.send(self.request(url, RAW_MEDIA_TYPE, token)).await {
            Ok(resp) => match resp.bytes().await {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(file = %entry.path, "failed to read file body: {e}");
                    return None;
                }
            },
            Err(e) => {
                tracing::warn!(file = %entry.path, "failed to fetch file: {e}");
                return None;
            }
        };

        let Ok(content) = String::from_utf8(bytes.to_vec()) else {
            tracing::warn!(file = %entry.path, "skipping file with unknown (non UTF-8) content");
            return None;
        };

        Some(RepoFile {
            metadata: FileMetadata {
                source: entry.path.clone(),
                repository: repo_url.to_owned(),
                branch: self.config.branch.clone(),
                sha: entry.sha,
                size: entry.size,
            },
            path: entry.path,
            content,
        })
    }
}

impl RepoHost for GithubClient {
    async fn list_repository_files(
        &self,
        repo_url: &str,
        token: Option<&str>,
        ignore: &IgnoreList,
    ) -> Result<Vec<RepoFile>> {
        let slug = RepoSlug::parse(repo_url)?;
        let blobs: Vec<TreeEntry> = self
            .list_blobs(&slug, token)
            .await?
            .into_iter()
            .filter(|e| {
                let skip = ignore.is_ignored(&e.path);
                if skip {
                    tracing::debug!(file = %e.path, "ignored");
                }
                !skip
            })
            .collect();

        let total = blobs.len();
        tracing::info!(repo = %slug, total, branch = %self.config.branch, "loading repository files");

        let mut files: Vec<RepoFile> = stream::iter(blobs)
            .map(|entry| self.fetch_blob(&slug, repo_url, entry, token))
            .buffer_unordered(self.config.max_concurrency)
            .filter_map(|f| async move { f })
            .collect()
            .await;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(repo = %slug, loaded = files.len(), skipped = total - files.len(), "repository files loaded");
        Ok(files)
    }

    async fn list_commits(&self, slug: &RepoSlug) -> Result<Vec<RemoteCommit>> {
        let url = self.api_url(&["repos", &slug.owner, &slug.repo, "commits"])?;
        let body = self
            .send(self.request(url, JSON_MEDIA_TYPE, None))
            .await?
            .text()
            .await?;
        let commits: Vec<ApiCommit> = serde_json::from_str(&body)?;
        Ok(commits.into_iter().map(RemoteCommit::from).collect())
    }

    async fn fetch_commit_diff(&self, repo_url: &str, commit_hash: &str) -> Result<String> {
        let slug = RepoSlug::parse(repo_url)?;
        let url = self.api_url(&["repos", &slug.owner, &slug.repo, "commits", commit_hash])?;
        let diff = self
            .send(self.request(url, DIFF_MEDIA_TYPE, None))
            .await?
            .text()
            .await?;
        Ok(diff)
    }
}
