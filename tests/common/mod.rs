#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use pagedigest::ai::SummaryBackend;
use pagedigest::core::models::LengthHint;
use pagedigest::errors::DigestError;
use pagedigest::news::NewsSource;
use pagedigest::pipeline::{PageFetcher, PipelineSettings};
use serde_json::Value;

pub fn settings(chunk_size: usize, map_concurrency: usize) -> PipelineSettings {
    PipelineSettings {
        chunk_size,
        map_concurrency,
        request_timeout: Duration::from_secs(10),
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn paragraphs(texts: &[&str]) -> String {
    let body: String = texts.iter().map(|t| format!("<p>{t}</p>")).collect();
    format!("<html><head><title>ignored</title></head><body>{body}</body></html>")
}

/// Serves the same markup for every URL.
pub struct StaticFetcher {
    markup: String,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, DigestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.markup.clone())
    }
}

pub struct FailingFetcher;

#[async_trait]
impl PageFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DigestError> {
        Err(DigestError::fetch(url, Some(404), "unexpected status 404 Not Found"))
    }
}

type Responder = Box<dyn Fn(&str, usize) -> Result<String, DigestError> + Send + Sync>;

/// Records every call and answers through a closure given the input and the
/// zero-based call number.
pub struct RecordingBackend {
    calls: Mutex<Vec<(String, LengthHint)>>,
    respond: Responder,
}

impl RecordingBackend {
    pub fn new(
        respond: impl Fn(&str, usize) -> Result<String, DigestError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn constant(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn hints(&self) -> Vec<LengthHint> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, hint)| hint.clone())
            .collect()
    }
}

#[async_trait]
impl SummaryBackend for RecordingBackend {
    async fn summarize(&self, text: &str, length: &LengthHint) -> Result<String, DigestError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), length.clone()));
            calls.len() - 1
        };
        (self.respond)(text, call)
    }
}

/// Wraps each input as `summary(<input>)`, finishing later segments first.
///
/// Inputs ending in a digit `d` sleep for `(max_digit - d) * step` so that
/// completion order is the reverse of segment order.
pub struct ReversingBackend {
    pub max_digit: u64,
    pub step: Duration,
    pub reduce_inputs: Mutex<Vec<String>>,
    pub completion_order: Mutex<Vec<String>>,
}

impl ReversingBackend {
    pub fn new(max_digit: u64, step: Duration) -> Self {
        Self {
            max_digit,
            step,
            reduce_inputs: Mutex::new(Vec::new()),
            completion_order: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SummaryBackend for ReversingBackend {
    async fn summarize(&self, text: &str, _length: &LengthHint) -> Result<String, DigestError> {
        let digit = text
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map_or(self.max_digit, u64::from);
        let delay = self.step * u32::try_from(self.max_digit.saturating_sub(digit)).unwrap();
        tokio::time::sleep(delay).await;
        self.completion_order.lock().unwrap().push(text.to_string());
        Ok(format!("summary({text})"))
    }

    async fn combine(&self, summaries: &str, _length: &LengthHint) -> Result<String, DigestError> {
        self.reduce_inputs.lock().unwrap().push(summaries.to_string());
        Ok("FINAL".to_string())
    }
}

/// Never answers within any reasonable deadline.
pub struct StallingBackend;

#[async_trait]
impl SummaryBackend for StallingBackend {
    async fn summarize(&self, _text: &str, _length: &LengthHint) -> Result<String, DigestError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

pub enum MockNews {
    Articles(Vec<Value>),
    Failing,
}

#[async_trait]
impl NewsSource for MockNews {
    async fn search(&self, _sector: &str) -> Result<Vec<Value>, DigestError> {
        match self {
            MockNews::Articles(articles) => Ok(articles.clone()),
            MockNews::Failing => Err(DigestError::NewsError {
                status: Some(401),
                message: "invalid api key".to_string(),
            }),
        }
    }
}
