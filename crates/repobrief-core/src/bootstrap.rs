//! Client construction from [`Config`].

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use repobrief_github::{GithubClient, GithubClientConfig, IgnoreList};
use repobrief_index::IndexerConfig;
use repobrief_llm::any::AnyProvider;
use repobrief_llm::gemini::GeminiProvider;
use repobrief_llm::openai::OpenAiProvider;
use repobrief_llm::retry::RetryPolicy;
use repobrief_store::SqliteStore;

use crate::config::{Config, ProviderKind};
use crate::project::ProjectService;

/// The service as wired for production use.
pub type AppService = ProjectService<Arc<GithubClient>, Arc<AnyProvider>>;

/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn create_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    repobrief_llm::http::client_with_timeout(std::time::Duration::from_secs(
        config.timeouts.http_seconds,
    ))
    .context("failed to build HTTP client")
}

/// # Errors
///
/// Returns an error if no API key is configured.
pub fn create_provider(config: &Config, http: reqwest::Client) -> anyhow::Result<AnyProvider> {
    let Some(api_key) = config.llm.api_key.as_ref() else {
        bail!("LLM API key is not set (REPOBRIEF_LLM_API_KEY or GEMINI_API_KEY)");
    };
    let api_key = api_key.expose().to_owned();

    let provider = match config.llm.provider {
        ProviderKind::Gemini => {
            let p = GeminiProvider::new(http, api_key, config.llm.model.clone());
            AnyProvider::Gemini(match &config.llm.base_url {
                Some(url) => p.with_base_url(url.clone()),
                None => p,
            })
        }
        ProviderKind::OpenAi => {
            let Some(base_url) = config.llm.base_url.clone() else {
                bail!("llm.base_url is required for the openai provider");
            };
            AnyProvider::OpenAi(OpenAiProvider::new(
                http,
                api_key,
                base_url,
                config.llm.model.clone(),
                config.llm.max_tokens,
            ))
        }
    };
    tracing::info!(provider = %config.llm.provider, model = %config.llm.model, "LLM provider ready");
    Ok(provider)
}

#[must_use]
pub fn create_github_client(config: &Config, http: reqwest::Client) -> GithubClient {
    GithubClient::new(
        http,
        GithubClientConfig {
            api_url: config.github.api_url.clone(),
            branch: config.github.branch.clone(),
            max_concurrency: config.github.max_concurrency,
            default_token: config.github.token.as_ref().map(|t| t.expose().to_owned()),
        },
    )
}

/// # Errors
///
/// Returns an error if an ignore pattern is not a valid glob.
pub fn indexer_config(config: &Config) -> anyhow::Result<IndexerConfig> {
    Ok(IndexerConfig {
        pacing: config.pacing(),
        retry: RetryPolicy::new(
            config.index.retry_max_attempts,
            std::time::Duration::from_millis(config.index.retry_base_delay_ms),
        ),
        llm_timeout: config.llm_timeout(),
        ignore: IgnoreList::new(config.github.ignore.as_slice()).context("invalid github.ignore pattern")?,
    })
}

/// Open the configured database, creating its parent directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the database cannot be opened.
pub async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.store.sqlite_path.as_str();
    if path != ":memory:"
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SqliteStore::new(path)
        .await
        .with_context(|| format!("failed to open database {path}"))
}

/// Build the full service from configuration.
///
/// # Errors
///
/// Returns an error if any client cannot be constructed.
pub async fn build_service(config: &Config) -> anyhow::Result<AppService> {
    let http = create_http_client(config)?;
    let provider = Arc::new(create_provider(config, http.clone())?);
    let host = Arc::new(create_github_client(config, http));
    let store = open_store(config).await?;
    Ok(ProjectService::new(
        host,
        provider,
        store,
        indexer_config(config)?,
        config.commits.refresh_on_read,
    ))
}
