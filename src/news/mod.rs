//! News search passthrough (GNews).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::errors::DigestError;
use crate::utils::retry::{RetryPolicy, with_retry};

pub const GNEWS_BASE_URL: &str = "https://gnews.io";
const LANGUAGE: &str = "en";
const COUNTRY: &str = "in";

/// Searches a news provider for articles on a topic.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Articles matching `sector`, exactly as the provider returned them.
    async fn search(&self, sector: &str) -> Result<Vec<Value>, DigestError>;
}

pub struct GNewsClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GNewsClient {
    #[must_use]
    pub fn new(client: Client, api_key: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            api_key,
            base_url: GNEWS_BASE_URL.to_string(),
            retry,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_once(&self, endpoint: &str, sector: &str) -> Result<Vec<Value>, DigestError> {
        let response = self
            .client
            .get(endpoint)
            .query(&[
                ("q", sector),
                ("lang", LANGUAGE),
                ("country", COUNTRY),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DigestError::NewsError {
                status: None,
                message: format!("request failed: {}", e.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DigestError::NewsError {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let data: Value = response.json().await.map_err(|e| DigestError::NewsError {
            status: Some(status.as_u16()),
            message: format!("malformed response: {e}"),
        })?;

        Ok(articles_from_response(&data))
    }
}

/// The `articles` array of a search response, or nothing if absent.
#[must_use]
pub fn articles_from_response(data: &Value) -> Vec<Value> {
    data.get("articles")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl NewsSource for GNewsClient {
    async fn search(&self, sector: &str) -> Result<Vec<Value>, DigestError> {
        let endpoint = format!("{}/api/v4/search", self.base_url.trim_end_matches('/'));
        let articles =
            with_retry(self.retry, "news_search", || self.search_once(&endpoint, sector)).await?;
        info!(sector, count = articles.len(), "News search complete");
        Ok(articles)
    }
}
