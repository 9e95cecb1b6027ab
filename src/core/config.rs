use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::core::models::LengthProfiles;
use crate::errors::DigestError;
use crate::utils::retry::RetryPolicy;

pub const DEFAULT_CHUNK_SIZE: usize = 3000;
pub const DEFAULT_MAP_CONCURRENCY: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";

/// Which summarization provider backs the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Gemini {
        api_key: String,
        model: String,
    },
    OpenAi {
        api_key: String,
        org_id: Option<String>,
        model: String,
    },
    HuggingFace {
        api_token: String,
        model: String,
    },
}

impl BackendConfig {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Gemini { .. } => "gemini",
            BackendConfig::OpenAi { .. } => "openai",
            BackendConfig::HuggingFace { .. } => "huggingface",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub gnews_api_key: String,
    pub chunk_size: usize,
    pub map_concurrency: usize,
    pub request_timeout: Duration,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    pub length_profiles: LengthProfiles,
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// when one is present.
    pub fn from_env() -> Result<Self, DigestError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_name = lookup("SUMMARY_BACKEND").unwrap_or_else(|| "gemini".to_string());
        let backend = match backend_name.trim().to_ascii_lowercase().as_str() {
            "gemini" => BackendConfig::Gemini {
                api_key: required(&lookup, "GEMINI_API_KEY")?,
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            "openai" => BackendConfig::OpenAi {
                api_key: required(&lookup, "OPENAI_API_KEY")?,
                org_id: lookup("OPENAI_ORG_ID"),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            },
            "huggingface" | "hf" => BackendConfig::HuggingFace {
                api_token: required(&lookup, "HF_API_TOKEN")?,
                model: lookup("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            },
            other => {
                return Err(DigestError::ConfigError(format!(
                    "SUMMARY_BACKEND: unknown backend '{other}' (expected gemini, openai or huggingface)"
                )));
            }
        };

        let chunk_size = parsed(&lookup, "CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        if chunk_size == 0 {
            return Err(DigestError::ConfigError(
                "CHUNK_SIZE: must be greater than zero".to_string(),
            ));
        }

        let map_concurrency = parsed(&lookup, "MAP_CONCURRENCY", DEFAULT_MAP_CONCURRENCY)?;
        if map_concurrency == 0 {
            return Err(DigestError::ConfigError(
                "MAP_CONCURRENCY: must be greater than zero".to_string(),
            ));
        }

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            attempts: parsed(&lookup, "RETRY_ATTEMPTS", defaults.attempts)?,
            base_delay_ms: parsed(&lookup, "RETRY_BASE_DELAY_MS", defaults.base_delay_ms)?,
        };

        Ok(Self {
            backend,
            gnews_api_key: required(&lookup, "GNEWS_API_KEY")?,
            chunk_size,
            map_concurrency,
            request_timeout: Duration::from_secs(parsed(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            http_timeout: Duration::from_secs(parsed(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            retry,
            length_profiles: LengthProfiles::default(),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, DigestError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DigestError::ConfigError(format!("{key}: not set"))),
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, DigestError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DigestError::ConfigError(format!("{key}: {e}"))),
    }
}
