//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create the shared HTTP client with standard repobrief configuration.
///
/// Config: 30s connect timeout, `timeout` per request, rustls TLS,
/// `repobrief/{version}` user-agent, redirect limit 10.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("repobrief/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}
