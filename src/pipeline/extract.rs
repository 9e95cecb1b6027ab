use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::errors::DigestError;

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector parse"));

/// Plain text pulled out of a fetched page. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    text: String,
}

impl ExtractedDocument {
    /// # Errors
    ///
    /// Returns `EmptyContent` when `text` is empty or only whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, DigestError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DigestError::EmptyContent);
        }
        Ok(Self { text })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Text of every `<p>` element in document order, joined by single spaces.
#[must_use]
pub fn extract_paragraph_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// # Errors
///
/// Returns `EmptyContent` when the page has no paragraph text.
pub fn extract(markup: &str) -> Result<ExtractedDocument, DigestError> {
    ExtractedDocument::new(extract_paragraph_text(markup))
}
