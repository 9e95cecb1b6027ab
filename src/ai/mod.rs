//! Summarization backends
//!
//! Every provider sits behind [`SummaryBackend`] so the pipeline never knows
//! which one it is talking to.

pub mod gemini;
pub mod huggingface;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::core::config::{AppConfig, BackendConfig};
use crate::core::models::LengthHint;
use crate::errors::DigestError;

pub use gemini::GeminiBackend;
pub use huggingface::HuggingFaceBackend;
pub use openai::OpenAiBackend;

#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Summarize one segment of source text.
    async fn summarize(&self, text: &str, length: &LengthHint) -> Result<String, DigestError>;

    /// Summarize the space-joined segment summaries into the final summary.
    ///
    /// Backends that phrase the reduce step differently override this.
    async fn combine(&self, summaries: &str, length: &LengthHint) -> Result<String, DigestError> {
        self.summarize(summaries, length).await
    }
}

/// Construct the backend named in the configuration.
#[must_use]
pub fn build_backend(config: &AppConfig, client: Client) -> Arc<dyn SummaryBackend> {
    let profiles = config.length_profiles.clone();
    match &config.backend {
        BackendConfig::Gemini { api_key, model } => Arc::new(GeminiBackend::new(
            client,
            api_key.clone(),
            model.clone(),
            profiles,
            config.retry,
        )),
        BackendConfig::OpenAi {
            api_key,
            org_id,
            model,
        } => Arc::new(OpenAiBackend::new(
            client,
            api_key.clone(),
            org_id.clone(),
            model.clone(),
            profiles,
            config.retry,
        )),
        BackendConfig::HuggingFace { api_token, model } => Arc::new(HuggingFaceBackend::new(
            client,
            api_token.clone(),
            model.clone(),
            profiles,
            config.retry,
        )),
    }
}

/// Send a provider request and decode its JSON body, translating every
/// failure into `BackendError`.
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value, DigestError> {
    let response = request
        .send()
        .await
        .map_err(|e| DigestError::backend(None, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_else(|e| {
            format!("Failed to read error response body (status {status}): {e}")
        });
        return Err(DigestError::backend(Some(status.as_u16()), error_text));
    }

    response.json::<Value>().await.map_err(|e| {
        DigestError::backend(
            Some(status.as_u16()),
            format!("malformed response: {e}"),
        )
    })
}

pub(crate) fn missing_text(what: &str) -> DigestError {
    DigestError::backend(
        Some(200),
        format!("malformed response: {what}"),
    )
}
