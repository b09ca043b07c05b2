//! Character n-gram tokenization.
//!
//! Strings are tokenized into fixed-length character trigrams. A
//! non-empty string shorter than the n-gram length is emitted as a
//! single token; the empty string yields no tokens at all (and so
//! becomes a zero vector, excluded from matching).

use std::borrow::Cow;

/// Fixed n-gram length used for tokenization.
pub const NGRAM_LEN: usize = 3;

/// Extract the length-[`NGRAM_LEN`] character windows of `s` as
/// borrowed subslices.
///
/// Windows advance one character at a time, so multi-byte characters
/// are never split. A non-empty string with fewer than [`NGRAM_LEN`]
/// characters yields itself as its only token.
pub fn extract_ngrams(s: &str) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, including the end of `s`.
    let mut offsets: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    offsets.push(s.len());

    let chars = offsets.len() - 1;
    if chars < NGRAM_LEN {
        return vec![s];
    }

    (0..=chars - NGRAM_LEN)
        .map(|i| &s[offsets[i]..offsets[i + NGRAM_LEN]])
        .collect()
}

/// Strip every character that is not ASCII alphanumeric, then
/// lowercase the remainder.
///
/// Applied identically and independently to both sides of a join when
/// word normalization is enabled.
pub fn word_normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Apply optional word normalization without copying when disabled.
pub fn maybe_word_normalize(s: &str, apply: bool) -> Cow<'_, str> {
    if apply {
        Cow::Owned(word_normalize(s))
    } else {
        Cow::Borrowed(s)
    }
}
