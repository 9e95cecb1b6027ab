//! HTTP surface: router, shared state and handlers.

pub mod handler;
pub mod helpers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::ai::{SummaryBackend, build_backend};
use crate::core::config::AppConfig;
use crate::errors::DigestError;
use crate::news::{GNewsClient, NewsSource};
use crate::pipeline::{HttpFetcher, PageFetcher, Pipeline, PipelineSettings};
use crate::utils::http::build_http_client;

/// Process-lifetime collaborators, constructed once and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub news: Arc<dyn NewsSource>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: Arc<Pipeline>, news: Arc<dyn NewsSource>) -> Self {
        Self { pipeline, news }
    }

    /// Wire the real HTTP fetcher, the configured backend and the news client
    /// around one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        let client = build_http_client(config.http_timeout)?;

        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpFetcher::new(client.clone(), config.retry));
        let backend: Arc<dyn SummaryBackend> = build_backend(config, client.clone());
        let news: Arc<dyn NewsSource> = Arc::new(GNewsClient::new(
            client,
            config.gnews_api_key.clone(),
            config.retry,
        ));

        let pipeline = Pipeline::new(fetcher, backend, PipelineSettings::from(config));
        Ok(Self::new(Arc::new(pipeline), news))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/summarize-url/", post(handler::summarize_url))
        .route("/news/:sector", get(handler::news_by_sector))
        .route("/health", get(handler::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
