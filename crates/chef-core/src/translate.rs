//! Best-effort translation helpers.
//!
//! A failed translation never fails the caller: the original text is kept
//! and the result is flagged so the interface can warn the user.

use async_trait::async_trait;
use tracing::warn;

use crate::error::LookupResult;
use crate::traits::Translator;

/// Translation services reject longer inputs.
pub const MAX_CHUNK_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub text: String,
    pub fell_back: bool,
}

impl Translated {
    fn kept(text: &str) -> Self {
        Self { text: text.to_string(), fell_back: true }
    }
}

/// Split `text` into pieces of at most `max_chars` characters, never inside
/// a UTF-8 sequence.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text];
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % max_chars == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

pub async fn translate_or_keep(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> Translated {
    if text.trim().is_empty() {
        return Translated { text: text.to_string(), fell_back: false };
    }
    match translator.translate(text, source, target).await {
        Ok(t) => Translated { text: t, fell_back: false },
        Err(e) => {
            warn!("translation {source}->{target} failed, keeping original: {e}");
            Translated::kept(text)
        }
    }
}

/// Translate arbitrarily long text chunk by chunk; chunks that fail stay in
/// the source language. Pieces are rejoined with a single space.
pub async fn translate_long(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> Translated {
    let mut parts = Vec::new();
    let mut fell_back = false;
    for chunk in chunk_text(text, MAX_CHUNK_CHARS) {
        let t = translate_or_keep(translator, chunk, source, target).await;
        fell_back |= t.fell_back;
        parts.push(t.text);
    }
    Translated { text: parts.join(" "), fell_back }
}

/// Returns every text unchanged. Used when translation is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> LookupResult<String> {
        Ok(text.to_string())
    }
}
