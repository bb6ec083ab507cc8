//! Test-only mock LLM provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::LlmProvider;

/// One scripted outcome of a `generate_text` call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    RateLimited,
    Fail(String),
}

impl MockReply {
    fn into_result(self) -> Result<String, LlmError> {
        match self {
            Self::Text(t) => Ok(t),
            Self::RateLimited => Err(LlmError::RateLimited),
            Self::Fail(msg) => Err(LlmError::Other(msg)),
        }
    }
}

/// Scripted provider.
///
/// Resolution order per call: the first rule whose needle appears in any prompt
/// part, then the next queued reply, then `default_response`.
#[derive(Debug, Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    rules: Arc<Mutex<Vec<(String, VecDeque<MockReply>)>>>,
    prompts: Arc<Mutex<Vec<Vec<String>>>>,
    pub default_response: String,
    pub fail_all: bool,
    /// Milliseconds to sleep before returning a response.
    pub delay_ms: u64,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail_all: false,
            delay_ms: 0,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    #[must_use]
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Answer prompts containing `needle` with `replies`, in order; the last
    /// reply repeats once the script runs out.
    #[must_use]
    pub fn when_prompt_contains(self, needle: impl Into<String>, replies: Vec<MockReply>) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push((needle.into(), replies.into()));
        }
        self
    }

    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Number of `generate_text` calls observed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map_or(0, |p| p.len())
    }

    /// Snapshot of every prompt received.
    #[must_use]
    pub fn prompts(&self) -> Vec<Vec<String>> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self, parts: &[String]) -> Option<MockReply> {
        if let Ok(mut rules) = self.rules.lock() {
            for (needle, script) in rules.iter_mut() {
                if parts.iter().any(|p| p.contains(needle.as_str())) {
                    return if script.len() > 1 {
                        script.pop_front()
                    } else {
                        script.front().cloned()
                    };
                }
            }
        }
        self.replies.lock().ok().and_then(|mut r| r.pop_front())
    }
}

impl LlmProvider for MockProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_text(&self, parts: &[String]) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(parts.to_vec());
        }
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail_all {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        match self.next_reply(parts) {
            Some(reply) => reply.into_result(),
            None => Ok(self.default_response.clone()),
        }
    }
}
