use std::time::Duration;

use repobrief_github::RepoHost;
use repobrief_llm::provider::{LlmProvider, generate_with_timeout};

const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

const DIFF_INSTRUCTIONS: &str = "\
You are an expert programmer, and you are trying to summarize a git diff.
Reminders about the git diff format:
For every file, there are a few metadata lines, like (for example):
```
diff --git a/lib/index.js b/lib/index.js
index aadf691..bfef603 100644
--- a/lib/index.js
+++ b/lib/index.js
```
This means that `lib/index.js` was modified in this commit. Note that this is only an example.
Then there is a specifier of the lines that were modified.
A line starting with `+` means it was added.
A line that starting with `-` means that line was deleted.
A line that starts with neither `+` nor `-` is code given for context and better understanding.
It is not part of the diff.

EXAMPLE SUMMARY COMMENTS:
```
* Raised the amount of returned recordings from `10` to `100` [packages/server/recordings_api.ts], [packages/server/constants.ts]
* Fixed a typo in the github action name [.github/workflows/gpt-commit-summarizer.yml]
* Moved the `octokit` initialization to a separate file [src/octokit.ts], [src/index.ts]
* Added an OpenAI API for completions [packages/utils/apis/openai.ts]
* Lowered numeric tolerance for test files
```
Most commits will have less comments than this examples list.
The last comment does not include the file names,
because there were more than two relevant files in the hypothetical commit.
Do not include parts of the example in your summary.
It is given only as an example of appropriate comments.";

/// Prompt parts for summarizing one diff.
#[must_use]
pub fn diff_prompt(diff: &str) -> Vec<String> {
    vec![
        DIFF_INSTRUCTIONS.to_owned(),
        format!("Please summarise the following diff file: \n\n{diff}"),
    ]
}

/// Summarizes commit diffs. Never retries; any failure yields an empty summary.
#[derive(Debug, Clone)]
pub struct CommitSummarizer<H, P> {
    host: H,
    provider: P,
    timeout: Duration,
}

impl<H: RepoHost, P: LlmProvider> CommitSummarizer<H, P> {
    #[must_use]
    pub fn new(host: H, provider: P) -> Self {
        Self {
            host,
            provider,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the diff of `commit_hash` and summarize it.
    pub async fn summarize(&self, repo_url: &str, commit_hash: &str) -> String {
        let diff = match self.host.fetch_commit_diff(repo_url, commit_hash).await {
            Ok(diff) => diff,
            Err(e) => {
                tracing::warn!(commit = commit_hash, "failed to fetch diff: {e}");
                return String::new();
            }
        };

        match generate_with_timeout(&self.provider, &diff_prompt(&diff), self.timeout).await {
            Ok(text) => text.trim().to_owned(),
            Err(e) => {
                tracing::warn!(commit = commit_hash, provider = self.provider.name(), "commit summary failed: {e}");
                String::new()
            }
        }
    }
}
