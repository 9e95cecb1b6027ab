use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Failed to fetch page {url} ({}): {message}", status_label(.status))]
    FetchError {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("No readable content found on the page.")]
    EmptyContent,

    #[error("Summarization backend error ({}): {message}", status_label(.status))]
    BackendError {
        status: Option<u16>,
        message: String,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to access news search API ({}): {message}", status_label(.status))]
    NewsError {
        status: Option<u16>,
        message: String,
    },
}

impl DigestError {
    pub fn fetch(url: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        DigestError::FetchError {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        DigestError::BackendError {
            status,
            message: message.into(),
        }
    }

    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Transport failures (no status), 408, 429 and any 5xx count as transient.
    /// Empty pages, timeouts of the whole request and config problems never do.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            DigestError::FetchError { status, .. }
            | DigestError::BackendError { status, .. }
            | DigestError::NewsError { status, .. } => match status {
                None => true,
                Some(code) => *code == 408 || *code == 429 || (500..600).contains(code),
            },
            DigestError::EmptyContent | DigestError::Timeout(_) | DigestError::ConfigError(_) => {
                false
            }
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no response".to_string(),
    }
}
