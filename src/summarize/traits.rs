// Abstractive summarizer trait.
//
// The summarization policy only needs "shorten this text to roughly N words".
// Backends: the hosted inference API (abstractive) and a local lead-sentence
// extractor. The policy treats every backend as fallible.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for producing a short summary of a single text.
#[async_trait]
pub trait AbstractiveSummarizer: Send + Sync {
    /// Summarize `text` into roughly `min_words..=max_words` words.
    ///
    /// Bounds are hints; the caller enforces the hard cap.
    async fn summarize(&self, text: &str, max_words: usize, min_words: usize) -> Result<String>;

    /// Backend name for logs and `status` output.
    fn name(&self) -> &'static str;
}

/// Summarizer used when abstractive summarization is switched off.
/// Always fails, so the policy falls through to truncation.
pub struct NoopSummarizer;

#[async_trait]
impl AbstractiveSummarizer for NoopSummarizer {
    async fn summarize(&self, _text: &str, _max_words: usize, _min_words: usize) -> Result<String> {
        anyhow::bail!("abstractive summarization is disabled (SCAMWATCH_SUMMARIZER=none)")
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
