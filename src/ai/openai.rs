//! `OpenAI` Responses API backend
//!
//! Builds chat-style prompts and posts them to the Responses endpoint.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use tracing::info;

use super::{SummaryBackend, missing_text, send_json};
use crate::core::models::{LengthHint, LengthProfiles};
use crate::errors::DigestError;
use crate::prompt::{SYSTEM_PROMPT, combine_prompt, segment_prompt};
use crate::utils::retry::{RetryPolicy, with_retry};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
    profiles: LengthProfiles,
    retry: RetryPolicy,
}

impl OpenAiBackend {
    #[must_use]
    pub fn new(
        client: Client,
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        profiles: LengthProfiles,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            org_id,
            model_name,
            base_url: OPENAI_BASE_URL.to_string(),
            profiles,
            retry,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn build_prompt(&self, user_prompt: String) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(SYSTEM_PROMPT.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(user_prompt),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    fn headers(&self) -> Result<HeaderMap, DigestError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|e| DigestError::backend(None, format!("Invalid Authorization header: {e}")))?;
        headers.insert("Authorization", auth_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                DigestError::backend(None, format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        Ok(headers)
    }

    fn request_body(&self, prompt: &[ChatCompletionMessage], length: &LengthHint) -> Value {
        let profile = self.profiles.for_hint(length);
        json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(prompt),
            "max_output_tokens": profile.max_output_tokens
        })
    }

    async fn generate(&self, user_prompt: String, length: &LengthHint) -> Result<String, DigestError> {
        #[cfg(feature = "debug-logs")]
        info!("Using OpenAI prompt:\n{}", user_prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            estimated_input_tokens = estimate_tokens(&user_prompt),
            "Generating summary with OpenAI"
        );

        let prompt = self.build_prompt(user_prompt);
        let request_body = self.request_body(&prompt, length);
        let headers = self.headers()?;
        let endpoint = format!("{}/v1/responses", self.base_url.trim_end_matches('/'));

        with_retry(self.retry, "openai_responses", || async {
            let request = self
                .client
                .post(&endpoint)
                .headers(headers.clone())
                .json(&request_body);
            let response_json = send_json(request).await?;
            extract_output_text(&response_json).ok_or_else(|| missing_text("no output text"))
        })
        .await
    }
}

#[async_trait]
impl SummaryBackend for OpenAiBackend {
    async fn summarize(&self, text: &str, length: &LengthHint) -> Result<String, DigestError> {
        self.generate(segment_prompt(text, length), length).await
    }

    async fn combine(&self, summaries: &str, length: &LengthHint) -> Result<String, DigestError> {
        self.generate(combine_prompt(summaries, length), length).await
    }
}

/// Read the generated text from a Responses API payload.
///
/// Prefers the top-level `output_text` convenience field, falling back to the
/// typed `output[].content[]` parts.
#[must_use]
pub fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str)
        && !text.trim().is_empty()
    {
        return Some(text.to_string());
    }

    let mut collected: Vec<String> = Vec::new();
    if let Some(items) = response_json.get("output").and_then(|o| o.as_array()) {
        for item in items {
            let Some(parts) = item.get("content").and_then(|c| c.as_array()) else {
                continue;
            };
            for p in parts {
                let is_output_text = p
                    .get("type")
                    .and_then(|t| t.as_str())
                    .is_some_and(|t| t == "output_text");
                if !is_output_text {
                    continue;
                }
                if let Some(s) = p.get("text").and_then(|t| t.as_str()) {
                    collected.push(s.to_string());
                } else if let Some(s) = p
                    .get("text")
                    .and_then(|t| t.get("value"))
                    .and_then(|v| v.as_str())
                {
                    collected.push(s.to_string());
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// Build Responses API input payload from a chat-style prompt.
/// - Filters out assistant messages (Responses treats assistant content as output)
/// - Emits typed `input_text` parts; image parts are not used by this service
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter(|m| !matches!(m.role, MessageRole::assistant))
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            match &m.content {
                Content::Text(t) => Some(json!({
                    "role": role_str,
                    "content": [{ "type": "input_text", "text": t }]
                })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}
