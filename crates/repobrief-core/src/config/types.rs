use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::secret::Secret;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub commits: CommitsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown LLM provider: {other}")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        })
    }
}

fn default_llm_model() -> String {
    repobrief_llm::gemini::DEFAULT_MODEL.to_owned()
}

fn default_max_tokens() -> u32 {
    1024
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Overrides the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub api_key: Option<Secret>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_llm_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            api_key: None,
        }
    }
}

fn default_api_url() -> String {
    repobrief_github::client::GITHUB_API_URL.to_owned()
}

fn default_branch() -> String {
    "main".to_owned()
}

fn default_max_concurrency() -> usize {
    5
}

fn default_ignore() -> Vec<String> {
    repobrief_github::ignore::DEFAULT_IGNORE_FILES
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Glob patterns matched against the path and the file name.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    /// Used when a project has no token of its own.
    #[serde(default)]
    pub token: Option<Secret>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            branch: default_branch(),
            max_concurrency: default_max_concurrency(),
            ignore: default_ignore(),
            token: None,
        }
    }
}

fn default_pacing_ms() -> u64 {
    4000
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CommitsConfig {
    /// Start a background poll whenever a project's commits are read.
    #[serde(default = "default_true")]
    pub refresh_on_read: bool,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            refresh_on_read: true,
        }
    }
}

fn default_sqlite_path() -> String {
    "data/repobrief.db".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_sqlite_path(),
        }
    }
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_http_timeout() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_llm_timeout")]
    pub llm_seconds: u64,
    #[serde(default = "default_http_timeout")]
    pub http_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_seconds: default_llm_timeout(),
            http_seconds: default_http_timeout(),
        }
    }
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_owned()
}

/// Trace export; only used by binaries built with the `otel` feature.
#[derive(Debug, Deserialize)]
pub struct ObservabilityConfig {
    /// `"otlp"` to export spans, anything else to log only.
    #[serde(default)]
    pub exporter: String,
    #[serde(default = "default_otlp_endpoint")]
    pub endpoint: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            exporter: String::new(),
            endpoint: default_otlp_endpoint(),
        }
    }
}
