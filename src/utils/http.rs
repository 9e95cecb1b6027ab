use std::time::Duration;

use reqwest::Client;

use crate::errors::DigestError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; pagedigest/0.1)";
const MAX_REDIRECTS: usize = 5;

/// Build the single outbound HTTP client shared by the fetcher, the
/// summarization backend and the news client.
///
/// # Errors
///
/// Returns `ConfigError` if the TLS backend cannot be initialised.
pub fn build_http_client(timeout: Duration) -> Result<Client, DigestError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| DigestError::ConfigError(format!("Failed to build HTTP client: {e}")))
}
