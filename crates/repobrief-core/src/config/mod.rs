mod env;
mod types;


pub use types::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject values the pipelines cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.github.branch.trim().is_empty() {
            bail!("github.branch must not be empty");
        }
        if self.github.max_concurrency == 0 {
            bail!("github.max_concurrency must be at least 1");
        }
        if self.index.retry_max_attempts == 0 {
            bail!("index.retry_max_attempts must be at least 1");
        }
        if self.timeouts.llm_seconds == 0 || self.timeouts.http_seconds == 0 {
            bail!("timeouts must be greater than zero");
        }
        if self.store.sqlite_path.trim().is_empty() {
            bail!("store.sqlite_path must not be empty");
        }
        if self.llm.provider == ProviderKind::OpenAi && self.llm.base_url.is_none() {
            bail!("llm.base_url is required for the openai provider");
        }
        Ok(())
    }

    #[must_use]
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.index.pacing_ms)
    }

    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.llm_seconds)
    }
}

/// Priority: `--config` argument > `REPOBRIEF_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("REPOBRIEF_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}
