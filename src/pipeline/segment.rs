/// Split `text` into contiguous slices of at most `max_chars` characters.
///
/// Boundaries fall on `char` boundaries and depend only on the input, so the
/// same text always yields the same segments. Concatenating the result
/// reproduces `text`. Empty input yields no segments; callers reject empty
/// documents before getting here.
#[must_use]
pub fn segment(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut segments = Vec::with_capacity(text.len() / max_chars + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            segments.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}
