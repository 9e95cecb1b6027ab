//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::helpers::JsonBody;
use crate::core::models::{NewsResponse, SummarizeRequest, SummarizeResponse};
use crate::errors::DigestError;

/// `POST /summarize-url/`
///
/// # Errors
///
/// Any pipeline failure becomes a 500 with a `detail` message. A body that
/// does not deserialize keeps axum's rejection status.
pub async fn summarize_url(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, DigestError> {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "summarize_url",
        %request_id,
        url = %request.url,
        length = request.summary_length.label()
    );

    async move {
        info!("Summarization requested");
        let summary = state
            .pipeline
            .summarize_url(&request.url, &request.summary_length)
            .await?;
        info!(summary_chars = summary.len(), "Summarization succeeded");
        Ok::<_, DigestError>(Json(SummarizeResponse { summary }))
    }
    .instrument(span)
    .await
}

/// `GET /news/:sector`
///
/// # Errors
///
/// Upstream search failures become a 500 with a `detail` message.
#[tracing::instrument(level = "info", skip(state))]
pub async fn news_by_sector(
    State(state): State<AppState>,
    Path(sector): Path<String>,
) -> Result<Json<NewsResponse>, DigestError> {
    let articles = state.news.search(&sector).await?;
    Ok(Json(NewsResponse::from_articles(&sector, articles)))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
