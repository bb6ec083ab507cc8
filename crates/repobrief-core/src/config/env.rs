use super::Config;
use crate::secret::Secret;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("REPOBRIEF_LLM_PROVIDER") {
            match v.parse() {
                Ok(kind) => self.llm.provider = kind,
                Err(e) => tracing::warn!("ignoring REPOBRIEF_LLM_PROVIDER: {e}"),
            }
        }
        if let Ok(v) = std::env::var("REPOBRIEF_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Some(v) = first_env(&["REPOBRIEF_LLM_API_KEY", "GEMINI_API_KEY"]) {
            self.llm.api_key = Some(Secret::new(v));
        }
        if let Ok(v) = std::env::var("REPOBRIEF_GITHUB_API_URL") {
            self.github.api_url = v;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_GITHUB_BRANCH") {
            self.github.branch = v;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_GITHUB_MAX_CONCURRENCY")
            && let Ok(n) = v.parse::<usize>()
        {
            self.github.max_concurrency = n;
        }
        if let Some(v) = first_env(&["REPOBRIEF_GITHUB_TOKEN", "GITHUB_TOKEN"]) {
            self.github.token = Some(Secret::new(v));
        }
        if let Ok(v) = std::env::var("REPOBRIEF_INDEX_PACING_MS")
            && let Ok(ms) = v.parse::<u64>()
        {
            self.index.pacing_ms = ms;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_INDEX_RETRY_MAX_ATTEMPTS")
            && let Ok(n) = v.parse::<u32>()
        {
            self.index.retry_max_attempts = n;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_COMMITS_REFRESH_ON_READ")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.commits.refresh_on_read = enabled;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_SQLITE_PATH") {
            self.store.sqlite_path = v;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_seconds = secs;
        }
        if let Ok(v) = std::env::var("REPOBRIEF_TIMEOUT_HTTP")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.http_seconds = secs;
        }
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| std::env::var(k).ok().filter(|v| !v.is_empty()))
}
