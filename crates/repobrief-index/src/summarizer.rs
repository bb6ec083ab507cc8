use std::time::Duration;

use repobrief_github::RepoFile;
use repobrief_llm::provider::{LlmProvider, generate_with_timeout};
use repobrief_llm::retry::{RetryPolicy, retry_rate_limited};

/// Characters of source sent to the model per file.
pub const MAX_SOURCE_CHARS: usize = 10_000;

const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-file summaries for onboarding engineers.
///
/// Never fails: exhausted retries, provider errors and timeouts all yield an
/// empty string, which the indexer treats as "skip this file".
#[derive(Debug, Clone)]
pub struct CodeSummarizer<P> {
    provider: P,
    retry: RetryPolicy,
    timeout: Duration,
}

impl<P: LlmProvider> CodeSummarizer<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn summarize(&self, file: &RepoFile) -> String {
        let parts = code_prompt(&file.path, &file.content);
        let result = retry_rate_limited("summarize_code", &self.retry, || {
            generate_with_timeout(&self.provider, &parts, self.timeout)
        })
        .await;

        match result {
            Ok(summary) => summary.trim().to_owned(),
            Err(e) => {
                tracing::warn!(file = %file.path, provider = self.provider.name(), "summary failed: {e}");
                String::new()
            }
        }
    }
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt parts for summarizing one file.
#[must_use]
pub fn code_prompt(path: &str, content: &str) -> Vec<String> {
    let code = truncate_chars(content, MAX_SOURCE_CHARS);
    vec![
        "You are an intelligent senior software engineer who specialises in onboarding \
         junior software engineers onto projects."
            .to_owned(),
        format!(
            "You are onboarding a junior software engineer and explaining to them the purpose \
             of the {path} file.\nHere is the code:\n---\n{code}\n---\n\
             Give a summary no more than 100 words of the code above."
        ),
    ]
}

#[cfg(test)]
mod tests {
    use repobrief_github::FileMetadata;
    use repobrief_llm::mock::{MockProvider, MockReply};

    use super::*;

    fn file(path: &str, content: &str) -> RepoFile {
        RepoFile {
            path: path.into(),
            content: content.into(),
            metadata: FileMetadata {
                source: path.into(),
                repository: "https://github.com/acme/widgets".into(),
                branch: "main".into(),
                sha: "s".into(),
                size: 0,
            },
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn prompt_truncates_source() {
        let long = "x".repeat(MAX_SOURCE_CHARS + 500);
        let parts = code_prompt("src/a.ts", &long);
        assert_eq!(parts.len(), 2);
        assert!(parts[1].contains("src/a.ts"));
        let xs = parts[1].chars().filter(|c| *c == 'x').count();
        assert_eq!(xs, MAX_SOURCE_CHARS);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_rate_limits_with_backoff() {
        let mock = MockProvider::with_replies(vec![
            MockReply::RateLimited,
            MockReply::RateLimited,
            MockReply::Text("Defines widget factory.".into()),
        ]);
        let summarizer = CodeSummarizer::new(mock.clone());

        let start = tokio::time::Instant::now();
        let summary = summarizer.summarize(&file("a.ts", "export {}")).await;

        assert_eq!(summary, "Defines widget factory.");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_give_empty_summary() {
        let mock = MockProvider::with_replies(vec![MockReply::RateLimited; 3]);
        let summary = CodeSummarizer::new(mock.clone())
            .summarize(&file("a.ts", "x"))
            .await;
        assert!(summary.is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn provider_error_gives_empty_summary_without_retry() {
        let mock = MockProvider::failing();
        let summary = CodeSummarizer::new(mock.clone())
            .summarize(&file("a.ts", "x"))
            .await;
        assert!(summary.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out_to_empty() {
        let mock = MockProvider::default().with_delay(120_000);
        let summary = CodeSummarizer::new(mock)
            .with_timeout(Duration::from_secs(30))
            .summarize(&file("a.ts", "x"))
            .await;
        assert!(summary.is_empty());
    }
}
