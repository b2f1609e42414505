// In-test fake adapters for the capability traits.
//
// None of these touch the network or model files. RuleClassifier stands in
// for a zero-shot model with a keyword -> label table, which is enough to
// drive the hierarchical labeler through known parent/child choices.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use scamwatch::classify::traits::{rank_descending, LabelScore, ZeroShotClassifier};
use scamwatch::pipeline::{ModelRegistry, Models};
use scamwatch::summarize::traits::AbstractiveSummarizer;
use scamwatch::topics::cluster::ThresholdClusterer;
use scamwatch::topics::tfidf::TfIdfEmbedder;

/// Labels whose keyword appears in the text share 0.9; the rest share 0.1.
/// With no hits at all, every label scores the same and the first wins.
pub struct RuleClassifier {
    rules: Vec<(String, String)>,
    pub calls: AtomicUsize,
}

impl RuleClassifier {
    pub fn new(rules: &[(&str, &str)]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(k, l)| (k.to_lowercase(), l.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Rules covering the scam types used across the integration tests.
    pub fn scam_rules() -> Self {
        Self::new(&[
            ("kyc", "identity and account scams"),
            ("kyc", "KYC update scam"),
            ("courier", "commerce and delivery scams"),
            ("courier", "fake courier delivery scam"),
            ("lottery", "lottery prize and reward scams"),
            ("lottery", "lottery win scam"),
            ("crypto", "investment and trading scams"),
            ("crypto", "crypto investment scam"),
            ("wallet", "investment and trading scams"),
            ("wallet", "crypto investment scam"),
        ])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZeroShotClassifier for RuleClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();

        let hits: Vec<bool> = labels
            .iter()
            .map(|label| {
                self.rules
                    .iter()
                    .any(|(keyword, target)| target == label && lower.contains(keyword.as_str()))
            })
            .collect();

        let n_hit = hits.iter().filter(|&&h| h).count();
        let n_miss = labels.len() - n_hit;
        let mut scores: Vec<LabelScore> = labels
            .iter()
            .zip(&hits)
            .map(|(label, &hit)| {
                let score = match (hit, n_hit, n_miss) {
                    (_, 0, _) | (_, _, 0) => 1.0 / labels.len() as f64,
                    (true, _, _) => 0.9 / n_hit as f64,
                    (false, _, _) => 0.1 / n_miss as f64,
                };
                LabelScore::new(label.clone(), score)
            })
            .collect();
        rank_descending(&mut scores);
        Ok(scores)
    }

    fn name(&self) -> &'static str {
        "rules"
    }
}

/// Shares a RuleClassifier so tests can read its call count after the
/// registry has taken ownership of the boxed adapter.
pub struct SharedClassifier(pub Arc<RuleClassifier>);

#[async_trait]
impl ZeroShotClassifier for SharedClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        self.0.classify(text, labels).await
    }

    fn name(&self) -> &'static str {
        "shared-rules"
    }
}

pub struct FailingClassifier;

#[async_trait]
impl ZeroShotClassifier for FailingClassifier {
    async fn classify(&self, _text: &str, _labels: &[String]) -> Result<Vec<LabelScore>> {
        anyhow::bail!("inference service unavailable")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct PanickingClassifier;

#[async_trait]
impl ZeroShotClassifier for PanickingClassifier {
    async fn classify(&self, _text: &str, _labels: &[String]) -> Result<Vec<LabelScore>> {
        panic!("boom")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

/// Returns the same summary for every text and counts calls.
pub struct FixedSummarizer {
    pub output: String,
    pub calls: AtomicUsize,
}

impl FixedSummarizer {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AbstractiveSummarizer for FixedSummarizer {
    async fn summarize(&self, _text: &str, _max_words: usize, _min_words: usize) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub struct FailingSummarizer;

#[async_trait]
impl AbstractiveSummarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str, _max_words: usize, _min_words: usize) -> Result<String> {
        anyhow::bail!("summarizer timed out")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Models with the given classifier, a fixed summarizer, TF-IDF embeddings
/// and the default threshold clusterer.
pub fn models_with(classifier: Box<dyn ZeroShotClassifier>) -> Models {
    Models {
        classifier,
        summarizer: Box::new(FixedSummarizer::new("Victim was asked to pay a fee.")),
        embedder: Box::new(TfIdfEmbedder),
        clusterer: Box::new(ThresholdClusterer::default()),
    }
}

/// Registry whose loader counts how many times it ran.
pub fn counting_registry(loads: Arc<AtomicUsize>) -> ModelRegistry {
    ModelRegistry::with_loader(move || {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(models_with(Box::new(RuleClassifier::scam_rules())))
    })
}
