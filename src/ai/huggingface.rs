use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{SummaryBackend, missing_text, send_json};
use crate::core::models::{LengthHint, LengthProfiles};
use crate::errors::DigestError;
use crate::utils::retry::{RetryPolicy, with_retry};

pub const HF_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Hosted summarization model (BART and friends) on the inference API.
///
/// The model takes raw text and numeric length bounds instead of a prompt, so
/// the reduce step is just another `summarize` call.
pub struct HuggingFaceBackend {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
    profiles: LengthProfiles,
    retry: RetryPolicy,
}

impl HuggingFaceBackend {
    #[must_use]
    pub fn new(
        client: Client,
        api_token: String,
        model: String,
        profiles: LengthProfiles,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_token,
            model,
            base_url: HF_BASE_URL.to_string(),
            profiles,
            retry,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn request_body(&self, text: &str, length: &LengthHint) -> Value {
        let profile = self.profiles.for_hint(length);
        json!({
            "inputs": text,
            "parameters": {
                "min_length": profile.min_length,
                "max_length": profile.max_length,
                "do_sample": false
            },
            "options": { "wait_for_model": true }
        })
    }
}

/// Read `[0].summary_text` from an inference API response.
#[must_use]
pub fn extract_summary_text(response: &Value) -> Option<String> {
    response
        .as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("summary_text"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl SummaryBackend for HuggingFaceBackend {
    async fn summarize(&self, text: &str, length: &LengthHint) -> Result<String, DigestError> {
        let body = self.request_body(text, length);
        let endpoint = self.endpoint();
        debug!(model = %self.model, input_chars = text.len(), "Calling inference API");

        with_retry(self.retry, "hf_summarize", || async {
            let request = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_token)
                .json(&body);
            let response_json = send_json(request).await?;
            extract_summary_text(&response_json).ok_or_else(|| missing_text("no summary_text"))
        })
        .await
    }
}
