use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::{is_safe_length_label, sanitize_length_label};

/// Qualitative verbosity directive threaded through the pipeline.
///
/// Backends translate it into provider-specific numbers via [`LengthProfile`];
/// the orchestrator only passes it along.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LengthHint {
    #[default]
    Short,
    Medium,
    Detailed,
    Custom(String),
}

impl LengthHint {
    /// Parse a free-form `summary_length` value. Unknown phrases are kept as
    /// a sanitized custom label; blank input falls back to `Short`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "short" | "short summary" | "brief" => LengthHint::Short,
            "medium" | "medium summary" => LengthHint::Medium,
            "detailed" | "detailed summary" | "long" => LengthHint::Detailed,
            _ => {
                let label = sanitize_length_label(raw.trim());
                if label.trim().is_empty() || !is_safe_length_label(&label) {
                    LengthHint::Short
                } else {
                    LengthHint::Custom(label)
                }
            }
        }
    }

    /// Phrase used inside generative prompts, e.g. "into a {label}".
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            LengthHint::Short => "short summary",
            LengthHint::Medium => "medium-length summary",
            LengthHint::Detailed => "detailed summary",
            LengthHint::Custom(label) => label.trim(),
        }
    }
}

impl From<String> for LengthHint {
    fn from(raw: String) -> Self {
        LengthHint::parse(&raw)
    }
}

/// Numeric bounds a backend derives from a [`LengthHint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthProfile {
    pub min_length: u32,
    pub max_length: u32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthProfiles {
    pub short: LengthProfile,
    pub medium: LengthProfile,
    pub detailed: LengthProfile,
}

impl LengthProfiles {
    #[must_use]
    pub fn for_hint(&self, hint: &LengthHint) -> LengthProfile {
        match hint {
            LengthHint::Short | LengthHint::Custom(_) => self.short,
            LengthHint::Medium => self.medium,
            LengthHint::Detailed => self.detailed,
        }
    }
}

impl Default for LengthProfiles {
    fn default() -> Self {
        Self {
            short: LengthProfile {
                min_length: 30,
                max_length: 80,
                max_output_tokens: 512,
            },
            medium: LengthProfile {
                min_length: 60,
                max_length: 150,
                max_output_tokens: 1024,
            },
            detailed: LengthProfile {
                min_length: 120,
                max_length: 250,
                max_output_tokens: 2048,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
    #[serde(default)]
    pub summary_length: LengthHint,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Result of a news search for one sector.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NewsResponse {
    Articles { sector: String, articles: Vec<Value> },
    Empty { sector: String, message: String },
}

impl NewsResponse {
    pub const NO_ARTICLES: &'static str = "No articles found.";

    #[must_use]
    pub fn from_articles(sector: &str, articles: Vec<Value>) -> Self {
        if articles.is_empty() {
            NewsResponse::Empty {
                sector: sector.to_string(),
                message: Self::NO_ARTICLES.to_string(),
            }
        } else {
            NewsResponse::Articles {
                sector: sector.to_string(),
                articles,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_hint_parses_known_labels() {
        assert_eq!(LengthHint::parse("short summary"), LengthHint::Short);
        assert_eq!(LengthHint::parse("  SHORT "), LengthHint::Short);
        assert_eq!(LengthHint::parse("medium"), LengthHint::Medium);
        assert_eq!(LengthHint::parse("Detailed Summary"), LengthHint::Detailed);
        assert_eq!(LengthHint::parse(""), LengthHint::Short);
    }

    #[test]
    fn test_length_hint_keeps_custom_label() {
        let hint = LengthHint::parse("three bullet points");
        assert_eq!(hint, LengthHint::Custom("three bullet points".to_string()));
        assert_eq!(hint.label(), "three bullet points");
    }

    #[test]
    fn test_request_defaults_to_short() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(req.summary_length, LengthHint::Short);

        let req: SummarizeRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "summary_length": "detailed"}"#,
        )
        .unwrap();
        assert_eq!(req.summary_length, LengthHint::Detailed);
    }

    #[test]
    fn test_custom_hint_uses_short_profile() {
        let profiles = LengthProfiles::default();
        let custom = LengthHint::Custom("one line".into());
        assert_eq!(profiles.for_hint(&custom), profiles.short);
        assert_eq!(profiles.for_hint(&LengthHint::Detailed).max_length, 250);
    }

    #[test]
    fn test_news_response_shapes() {
        let empty = NewsResponse::from_articles("tech", Vec::new());
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({"sector": "tech", "message": "No articles found."})
        );

        let full = NewsResponse::from_articles("tech", vec![serde_json::json!({"title": "A"})]);
        assert_eq!(
            serde_json::to_value(&full).unwrap(),
            serde_json::json!({"sector": "tech", "articles": [{"title": "A"}]})
        );
    }
}
