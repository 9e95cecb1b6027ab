use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{SummaryBackend, missing_text, send_json};
use crate::core::models::{LengthHint, LengthProfiles};
use crate::errors::DigestError;
use crate::prompt::{SYSTEM_PROMPT, combine_prompt, segment_prompt};
use crate::utils::retry::{RetryPolicy, with_retry};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    profiles: LengthProfiles,
    retry: RetryPolicy,
}

impl GeminiBackend {
    #[must_use]
    pub fn new(
        client: Client,
        api_key: String,
        model: String,
        profiles: LengthProfiles,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
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
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, prompt: &str, length: &LengthHint) -> Value {
        let profile = self.profiles.for_hint(length);
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": profile.max_output_tokens }
        })
    }

    async fn generate(&self, prompt: String, length: &LengthHint) -> Result<String, DigestError> {
        let body = self.request_body(&prompt, length);
        let endpoint = self.endpoint();
        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        with_retry(self.retry, "gemini_generate", || async {
            let request = self
                .client
                .post(&endpoint)
                .header("x-goog-api-key", &self.api_key)
                .json(&body);
            let response_json = send_json(request).await?;
            extract_candidate_text(&response_json)
        })
        .await
    }
}

/// Pull the generated text out of a `generateContent` response.
///
/// # Errors
///
/// Returns `BackendError` when the prompt was blocked or no candidate text is
/// present.
pub fn extract_candidate_text(response: &Value) -> Result<String, DigestError> {
    if let Some(reason) = response
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(DigestError::backend(
            Some(200),
            format!("prompt blocked by provider: {reason}"),
        ));
    }

    let text = response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(missing_text("no candidate text"));
    }
    Ok(text)
}

#[async_trait]
impl SummaryBackend for GeminiBackend {
    async fn summarize(&self, text: &str, length: &LengthHint) -> Result<String, DigestError> {
        self.generate(segment_prompt(text, length), length).await
    }

    async fn combine(&self, summaries: &str, length: &LengthHint) -> Result<String, DigestError> {
        self.generate(combine_prompt(summaries, length), length).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(
            Client::new(),
            "key".into(),
            "gemini-1.5-pro".into(),
            LengthProfiles::default(),
            RetryPolicy::none(),
        )
    }

    #[test]
    fn test_endpoint_uses_model_and_base_url() {
        let b = backend().with_base_url("http://localhost:9000/");
        assert_eq!(
            b.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_carries_prompt_and_token_limit() {
        let body = backend().request_body("hello", &LengthHint::Detailed);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_extract_candidate_text_joins_parts() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Part one. " }, { "text": "Part two." }] } }]
        });
        assert_eq!(
            extract_candidate_text(&response).unwrap(),
            "Part one. Part two."
        );
    }

    #[test]
    fn test_extract_candidate_text_errors() {
        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_candidate_text(&blocked).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let empty = json!({ "candidates": [] });
        assert!(matches!(
            extract_candidate_text(&empty),
            Err(DigestError::BackendError { status: Some(200), .. })
        ));
    }
}
