// Zero-shot classifier trait: the swap-ready abstraction.
//
// The hierarchical labeler only needs "rank these candidate labels for this
// text". The default implementation runs a local NLI model through ONNX
// Runtime; the hosted inference API is available as an alternative.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One candidate label with its score (0.0 to 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Trait for zero-shot text classification over a caller-supplied label set.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Rank `candidate_labels` for `text`, highest score first.
    ///
    /// Implementations return every candidate exactly once. Ordering among
    /// equal scores is up to the implementation; callers take the first entry.
    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>>;

    /// Backend name for logs and `status` output.
    fn name(&self) -> &'static str;
}

/// Sort scores descending. Stable, so equal scores keep candidate order.
pub fn rank_descending(scores: &mut [LabelScore]) {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending_orders_by_score() {
        let mut scores = vec![
            LabelScore::new("a", 0.1),
            LabelScore::new("b", 0.7),
            LabelScore::new("c", 0.2),
        ];
        rank_descending(&mut scores);
        let labels: Vec<&str> = scores.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_descending_keeps_candidate_order_on_ties() {
        let mut scores = vec![
            LabelScore::new("first", 0.5),
            LabelScore::new("second", 0.5),
        ];
        rank_descending(&mut scores);
        assert_eq!(scores[0].label, "first");
    }
}
