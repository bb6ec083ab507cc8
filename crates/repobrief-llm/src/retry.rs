use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_BACKOFF_SECS: u64 = 2;

/// Bounded exponential backoff applied when a provider reports [`LlmError::RateLimited`].
///
/// `max_attempts` counts every call, including the first one. The delay before
/// retry `n` (zero-based) is `base_delay * 2^n`, so the defaults wait 2s, then 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(DEFAULT_BASE_BACKOFF_SECS),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff to wait after the failed attempt with index `attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Run `f`, retrying on [`LlmError::RateLimited`] according to `policy`.
///
/// Any other error is returned immediately without retrying.
///
/// # Errors
///
/// Returns `LlmError::RateLimited` if all attempts are exhausted, or the first
/// non-rate-limit error produced by `f`.
pub async fn retry_rate_limited<T, F, Fut>(
    operation: &str,
    policy: &RetryPolicy,
    mut f: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 0..attempts {
        match f().await {
            Err(LlmError::RateLimited) if attempt + 1 < attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_secs = delay.as_secs(),
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }

    Err(LlmError::RateLimited)
}
