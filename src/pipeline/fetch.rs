use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::DigestError;
use crate::utils::retry::{RetryPolicy, with_retry};

/// Retrieves raw page markup for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DigestError>;
}

/// Accept only absolute http(s) URLs.
///
/// # Errors
///
/// Returns `FetchError` without a status for anything else.
pub fn validate_url(raw: &str) -> Result<Url, DigestError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DigestError::fetch(raw, None, format!("invalid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DigestError::fetch(
            raw,
            None,
            format!("unsupported URL scheme '{other}'"),
        )),
    }
}

pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, DigestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                DigestError::fetch(
                    url.as_str(),
                    e.status().map(|s| s.as_u16()),
                    format!("request failed: {e}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::fetch(
                url.as_str(),
                Some(status.as_u16()),
                format!("unexpected status {status}"),
            ));
        }

        let body = response.text().await.map_err(|e| {
            DigestError::fetch(
                url.as_str(),
                Some(status.as_u16()),
                format!("failed to read body: {e}"),
            )
        })?;
        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DigestError> {
        let url = validate_url(url)?;
        with_retry(self.retry, "fetch_page", || self.fetch_once(&url)).await
    }
}
