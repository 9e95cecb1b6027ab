/// pagedigest - summarizes web pages through a swappable LLM backend and
/// proxies a news search API.
///
/// A summarize request runs a three-stage pipeline:
/// 1. Fetch the page markup over HTTP
/// 2. Extract the text of every paragraph
/// 3. Split the text into fixed-width segments, summarize each one, then
///    summarize the joined segment summaries into a single result
///
/// # Architecture
///
/// The system uses:
/// - axum for the HTTP surface
/// - reqwest for outbound calls, shared through one injected client
/// - scraper for paragraph extraction
/// - Gemini, `OpenAI` or a Hugging Face model behind the `SummaryBackend` trait
/// - tokio-retry for bounded backoff on transient failures
///
/// # Example
///
/// ```no_run
/// use pagedigest::api::{AppState, router};
/// use pagedigest::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     pagedigest::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let state = AppState::from_config(&config)?;
///
///     let summary = state
///         .pipeline
///         .summarize_url("https://example.com/article", &Default::default())
///         .await?;
///     println!("Summary: {summary}");
///
///     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
///     axum::serve(listener, router(state)).await?;
///     Ok(())
/// }
/// ```
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod news;
pub mod pipeline;
pub mod prompt;
pub mod utils;

/// Configure structured JSON logging.
///
/// Verbosity follows `RUST_LOG` and defaults to `info`. Safe to call more than
/// once; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// pagedigest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
