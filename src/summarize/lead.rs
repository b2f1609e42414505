// Extractive lead-sentence summarizer.
//
// Offline backend for when no hosted summarizer is configured: keeps the
// opening sentences of the report until the minimum word count is reached.
// Incident reports usually state the scam in the first sentence or two.

use anyhow::Result;
use async_trait::async_trait;

use super::traits::AbstractiveSummarizer;

/// Takes leading sentences up to the word budget.
pub struct LeadSentenceSummarizer;

#[async_trait]
impl AbstractiveSummarizer for LeadSentenceSummarizer {
    async fn summarize(&self, text: &str, max_words: usize, min_words: usize) -> Result<String> {
        let summary = lead_sentences(text, max_words, min_words);
        if summary.is_empty() {
            anyhow::bail!("no sentences found in text");
        }
        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "lead"
    }
}

/// Collect whole sentences until at least `min_words` words are gathered,
/// never exceeding `max_words` (the final sentence is cut if needed).
pub fn lead_sentences(text: &str, max_words: usize, min_words: usize) -> String {
    let mut words: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        for word in sentence.split_whitespace() {
            if words.len() == max_words {
                return words.join(" ");
            }
            words.push(word);
        }
        if words.len() >= min_words {
            break;
        }
    }

    words.join(" ")
}

/// Split on sentence-ending punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_i, next_c)) = chars.peek() {
                if next_c.is_whitespace() {
                    sentences.push(&text[start..next_i]);
                    start = next_i;
                }
            } else {
                sentences.push(&text[start..i + c.len_utf8()]);
                start = text.len();
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
