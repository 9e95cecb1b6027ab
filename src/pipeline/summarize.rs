//! Map-reduce summarization over fixed-width text segments.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

use super::extract::ExtractedDocument;
use super::segment::segment;
use crate::ai::SummaryBackend;
use crate::core::models::LengthHint;
use crate::errors::DigestError;

pub struct MapReduceSummarizer {
    backend: Arc<dyn SummaryBackend>,
    chunk_size: usize,
    concurrency: usize,
}

impl MapReduceSummarizer {
    #[must_use]
    pub fn new(backend: Arc<dyn SummaryBackend>, chunk_size: usize, concurrency: usize) -> Self {
        Self {
            backend,
            chunk_size: chunk_size.max(1),
            concurrency: concurrency.max(1),
        }
    }

    /// Summarize every segment, then summarize the joined segment summaries.
    ///
    /// Up to `concurrency` segment calls run at once; their results are kept in
    /// segment order. The first failure cancels the remaining calls and fails
    /// the whole document, and the reduce call always runs, even for a single
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns `EmptyContent` for a document with no segments, or the first
    /// `BackendError` raised by any call.
    pub async fn summarize_document(
        &self,
        doc: &ExtractedDocument,
        length: &LengthHint,
    ) -> Result<String, DigestError> {
        let segments = segment(doc.text(), self.chunk_size);
        if segments.is_empty() {
            return Err(DigestError::EmptyContent);
        }

        let started = Instant::now();
        info!(
            segments = segments.len(),
            chunk_size = self.chunk_size,
            concurrency = self.concurrency,
            "Map stage starting"
        );

        let backend = self.backend.as_ref();
        let calls: Vec<_> = segments
            .iter()
            .enumerate()
            .map(|(index, text)| async move {
                backend.summarize(text, length).await.inspect_err(|e| {
                    warn!(segment = index, error = %e, "Segment summarization failed");
                })
            })
            .collect();
        let summaries: Vec<String> = stream::iter(calls)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        info!(
            elapsed_ms = started.elapsed().as_millis(),
            "Map stage complete"
        );

        let joined = summaries.join(" ");
        let final_summary = self.backend.combine(&joined, length).await.inspect_err(|e| {
            warn!(error = %e, "Reduce stage failed");
        })?;

        info!(
            elapsed_ms = started.elapsed().as_millis(),
            summary_chars = final_summary.len(),
            "Reduce stage complete"
        );
        Ok(final_summary)
    }
}
