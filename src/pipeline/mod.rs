//! Fetch → extract → map-reduce summarize, per request.

pub mod extract;
pub mod fetch;
pub mod segment;
pub mod summarize;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::SummaryBackend;
use crate::core::config::AppConfig;
use crate::core::models::LengthHint;
use crate::errors::DigestError;

pub use extract::{ExtractedDocument, extract, extract_paragraph_text};
pub use fetch::{HttpFetcher, PageFetcher};
pub use segment::segment;
pub use summarize::MapReduceSummarizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub chunk_size: usize,
    pub map_concurrency: usize,
    pub request_timeout: Duration,
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            map_concurrency: config.map_concurrency,
            request_timeout: config.request_timeout,
        }
    }
}

pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    summarizer: MapReduceSummarizer,
    request_timeout: Duration,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        backend: Arc<dyn SummaryBackend>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher,
            summarizer: MapReduceSummarizer::new(
                backend,
                settings.chunk_size,
                settings.map_concurrency,
            ),
            request_timeout: settings.request_timeout,
        }
    }

    /// Produce one summary for the page at `url`.
    ///
    /// The whole run is bounded by the request timeout; when it fires, every
    /// in-flight fetch or backend call is dropped.
    ///
    /// # Errors
    ///
    /// `FetchError`, `EmptyContent`, `BackendError` or `Timeout`; no partial
    /// summary is ever returned.
    pub async fn summarize_url(&self, url: &str, length: &LengthHint) -> Result<String, DigestError> {
        match tokio::time::timeout(self.request_timeout, self.run(url, length)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.request_timeout, "Summarization deadline exceeded");
                Err(DigestError::Timeout(self.request_timeout))
            }
        }
    }

    async fn run(&self, url: &str, length: &LengthHint) -> Result<String, DigestError> {
        let markup = self.fetcher.fetch(url).await?;
        let doc = extract(&markup)?;
        debug!(chars = doc.char_count(), "Extracted paragraph text");
        self.summarizer.summarize_document(&doc, length).await
    }
}
