// Hierarchical labeler: parent category first, then a child label within it.
//
// Two small zero-shot calls (10 parents, then at most 10 children) instead of
// one flat call over 100 labels. Classifier errors are not caught here; they
// propagate to the pipeline boundary.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::traits::{LabelScore, ZeroShotClassifier};
use crate::taxonomy::Taxonomy;

/// Two-level label with confidences. Empty strings and 0.0 mean "not computed".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub parent_category: String,
    pub child_label: String,
    pub parent_confidence: f64,
    pub child_confidence: f64,
}

impl Classification {
    /// The result for empty text: no parent, no child, zero confidences.
    pub fn unclassified() -> Self {
        Self::default()
    }

    /// Child label as an option (None when empty).
    pub fn child(&self) -> Option<&str> {
        if self.child_label.is_empty() {
            None
        } else {
            Some(&self.child_label)
        }
    }
}

/// Applies a zero-shot classifier twice per text against a taxonomy.
pub struct HierarchicalLabeler<'a> {
    classifier: &'a dyn ZeroShotClassifier,
    taxonomy: &'a Taxonomy,
}

impl<'a> HierarchicalLabeler<'a> {
    pub fn new(classifier: &'a dyn ZeroShotClassifier, taxonomy: &'a Taxonomy) -> Self {
        Self {
            classifier,
            taxonomy,
        }
    }

    /// Assign a parent category and, when the parent has children, a child label.
    pub async fn classify(&self, text: &str) -> Result<Classification> {
        if text.trim().is_empty() {
            return Ok(Classification::unclassified());
        }

        let parent = top_label(self.classifier, text, self.taxonomy.parents())
            .await
            .context("Parent category classification failed")?;

        let children = self.taxonomy.children(&parent.label);
        if children.is_empty() {
            debug!(parent = %parent.label, "Parent has no child labels");
            return Ok(Classification {
                parent_category: parent.label,
                child_label: String::new(),
                parent_confidence: parent.score,
                child_confidence: 0.0,
            });
        }

        let child = top_label(self.classifier, text, children)
            .await
            .with_context(|| format!("Child label classification failed under '{}'", parent.label))?;

        debug!(
            parent = %parent.label,
            child = %child.label,
            parent_score = parent.score,
            child_score = child.score,
            "Classified incident"
        );

        Ok(Classification {
            parent_category: parent.label,
            child_label: child.label,
            parent_confidence: parent.score,
            child_confidence: child.score,
        })
    }
}

/// Run one classifier call and take the first ranked entry.
///
/// The winning label must be one of the candidates, otherwise the taxonomy
/// invariant (child belongs to its parent) could be broken by a bad adapter.
async fn top_label(
    classifier: &dyn ZeroShotClassifier,
    text: &str,
    candidates: &[String],
) -> Result<LabelScore> {
    let ranked = classifier.classify(text, candidates).await?;
    let top = ranked
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("{} returned no labels", classifier.name()))?;

    if !candidates.iter().any(|c| *c == top.label) {
        anyhow::bail!(
            "{} returned label '{}' which is not a candidate",
            classifier.name(),
            top.label
        );
    }

    Ok(LabelScore {
        label: top.label,
        score: top.score.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores the last candidate highest, so tests can predict the winner.
    struct LastWins {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ZeroShotClassifier for LastWins {
        async fn classify(&self, _text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = labels.len() as f64;
            Ok(labels
                .iter()
                .enumerate()
                .rev()
                .map(|(i, l)| LabelScore::new(l.clone(), (i as f64 + 1.0) / n))
                .collect())
        }

        fn name(&self) -> &'static str {
            "last-wins"
        }
    }

    struct Rogue;

    #[async_trait]
    impl ZeroShotClassifier for Rogue {
        async fn classify(&self, _text: &str, _labels: &[String]) -> Result<Vec<LabelScore>> {
            Ok(vec![LabelScore::new("made up", 0.9)])
        }

        fn name(&self) -> &'static str {
            "rogue"
        }
    }

    fn small_taxonomy() -> Taxonomy {
        Taxonomy::from_parts(
            vec![
                ("alpha".to_string(), vec!["a1".to_string(), "a2".to_string()]),
                ("beta".to_string(), vec![]),
            ],
            vec![],
        )
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_calls() {
        let clf = LastWins {
            calls: AtomicUsize::new(0),
        };
        let tax = small_taxonomy();
        let result = HierarchicalLabeler::new(&clf, &tax)
            .classify("   \n")
            .await
            .unwrap();
        assert_eq!(result, Classification::unclassified());
        assert_eq!(clf.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_childless_parent_keeps_parent_confidence() {
        let clf = LastWins {
            calls: AtomicUsize::new(0),
        };
        let tax = small_taxonomy();
        let result = HierarchicalLabeler::new(&clf, &tax)
            .classify("some text")
            .await
            .unwrap();
        assert_eq!(result.parent_category, "beta");
        assert!(result.child_label.is_empty());
        assert!((result.parent_confidence - 1.0).abs() < 1e-9);
        assert_eq!(result.child_confidence, 0.0);
        assert_eq!(clf.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rogue_label_is_an_error() {
        let tax = small_taxonomy();
        let result = HierarchicalLabeler::new(&Rogue, &tax).classify("text").await;
        assert!(result.is_err());
    }
}
