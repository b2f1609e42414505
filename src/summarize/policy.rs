// Summarization policy: template, passthrough, abstractive, truncation.
//
// The policy never fails. Whatever the backend does (error, empty answer,
// an essay), the caller gets a usable summary string.

use tracing::{debug, warn};

use super::traits::AbstractiveSummarizer;
use crate::taxonomy::Taxonomy;

/// Texts shorter than this many words are returned as-is.
pub const MIN_ABSTRACTIVE_WORDS: usize = 12;

/// Hard cap on abstractive output, in words.
pub const MAX_SUMMARY_WORDS: usize = 40;

/// Character budget for the truncation fallback.
pub const FALLBACK_CHARS: usize = 200;

/// Applies the fallback chain for one incident's summary.
pub struct Summarizer<'a> {
    backend: &'a dyn AbstractiveSummarizer,
    taxonomy: &'a Taxonomy,
}

impl<'a> Summarizer<'a> {
    pub fn new(backend: &'a dyn AbstractiveSummarizer, taxonomy: &'a Taxonomy) -> Self {
        Self { backend, taxonomy }
    }

    /// Summarize one incident given its (possibly empty) child label.
    pub async fn summarize(&self, child_label: &str, text: &str) -> String {
        if let Some(template) = self.taxonomy.template(child_label) {
            return template.to_string();
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        if word_count(trimmed) < MIN_ABSTRACTIVE_WORDS {
            return trimmed.to_string();
        }

        match self
            .backend
            .summarize(text, MAX_SUMMARY_WORDS, MIN_ABSTRACTIVE_WORDS)
            .await
        {
            Ok(summary) => {
                let capped = cap_words(summary.trim(), MAX_SUMMARY_WORDS);
                if capped.is_empty() {
                    debug!(backend = self.backend.name(), "Empty summary, using truncation");
                    truncation_fallback(text)
                } else {
                    capped
                }
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Summarizer failed, using truncation"
                );
                truncation_fallback(text)
            }
        }
    }
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max_words` words, joined by single spaces.
pub fn cap_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `FALLBACK_CHARS` characters of the raw text, trimmed.
pub fn truncation_fallback(text: &str) -> String {
    let head: String = text.chars().take(FALLBACK_CHARS).collect();
    head.trim().to_string()
}
