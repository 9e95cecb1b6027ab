use crate::core::models::LengthHint;

/// Role markers and template braces that must not reach a prompt through a
/// user-supplied length label
pub const DISALLOWED_PATTERNS: [&str; 4] = ["system:", "assistant:", "user:", "{{"];

/// Max length for a custom length label (after which we truncate)
pub const MAX_LENGTH_LABEL_LEN: usize = 200;

pub const SYSTEM_PROMPT: &str = "You are a summarization assistant. \
    Output ONLY the requested summary as plain prose: no preamble, no headings \
    about the task, no hidden thoughts. Never invent facts that are not in the input.";

/// Remove control characters and hard-truncate a custom length label.
#[must_use]
pub fn sanitize_length_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .take(MAX_LENGTH_LABEL_LEN)
        .collect()
}

/// Returns false when the label carries something that looks like a prompt
/// injection attempt.
#[must_use]
pub fn is_safe_length_label(label: &str) -> bool {
    let lowered = label.to_lowercase();
    !DISALLOWED_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// Prompt for one segment in the map stage.
#[must_use]
pub fn segment_prompt(text: &str, hint: &LengthHint) -> String {
    format!(
        "Summarize the following text into a {}: {text}",
        hint.label()
    )
}

/// Prompt for the reduce stage over the joined segment summaries.
#[must_use]
pub fn combine_prompt(summaries: &str, hint: &LengthHint) -> String {
    format!(
        "Summarize the following summaries into a final {}: {summaries}",
        hint.label()
    )
}
