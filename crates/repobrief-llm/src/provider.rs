use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

pub trait LlmProvider: Send + Sync {
    /// Send an ordered list of prompt parts and return the generated text.
    ///
    /// Implementations must map provider throttling (HTTP 429) to
    /// [`LlmError::RateLimited`] so callers can apply their backoff policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response is invalid.
    fn generate_text(
        &self,
        parts: &[String],
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    fn name(&self) -> &str;
}

impl<P: LlmProvider> LlmProvider for std::sync::Arc<P> {
    async fn generate_text(&self, parts: &[String]) -> Result<String, LlmError> {
        self.as_ref().generate_text(parts).await
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }
}

/// Call `provider` once, failing with [`LlmError::Timeout`] if it does not answer
/// within `timeout`.
///
/// # Errors
///
/// Returns the provider's error, or `LlmError::Timeout` on expiry.
pub async fn generate_with_timeout<P: LlmProvider>(
    provider: &P,
    parts: &[String],
    timeout: Duration,
) -> Result<String, LlmError> {
    tokio::time::timeout(timeout, provider.generate_text(parts))
        .await
        .map_err(|_| LlmError::Timeout(timeout.as_secs()))?
}
