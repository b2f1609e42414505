// Unit tests for topic assignment.
//
// Uses the TF-IDF embedder so clustering runs without model files. Texts
// that share every term embed identically; texts with disjoint vocabulary
// are orthogonal. That makes cluster membership predictable.

use anyhow::Result;
use async_trait::async_trait;

use scamwatch::topics::assign_topics;
use scamwatch::topics::cluster::ThresholdClusterer;
use scamwatch::topics::tfidf::{tfidf_vectors, TfIdfEmbedder};
use scamwatch::topics::traits::{TextEmbedder, TopicAssignment, TopicClusterer, NOISE_TOPIC};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const COURIER: &str = "Courier parcel stuck, redelivery fee requested via link";
const LOTTERY: &str = "Lottery jackpot winner must pay processing charge";
const LONER: &str = "Matrimonial profile asked for visa money";

// ============================================================================
// ThresholdClusterer
// ============================================================================

#[test]
fn identical_texts_share_a_topic() {
    let texts = strings(&[COURIER, LOTTERY, COURIER, LOTTERY, COURIER]);
    let vectors = tfidf_vectors(&texts);
    let assignment = ThresholdClusterer::default().cluster(&texts, &vectors).unwrap();
    // Larger cluster gets the lower id
    assert_eq!(assignment.topic_ids, vec![0, 1, 0, 1, 0]);
}

#[test]
fn singleton_is_noise() {
    let texts = strings(&[COURIER, LONER, COURIER]);
    let vectors = tfidf_vectors(&texts);
    let assignment = ThresholdClusterer::default().cluster(&texts, &vectors).unwrap();
    assert_eq!(assignment.topic_ids, vec![0, NOISE_TOPIC, 0]);
}

#[test]
fn min_cluster_size_one_keeps_singletons() {
    let texts = strings(&[COURIER, LONER, COURIER]);
    let vectors = tfidf_vectors(&texts);
    let clusterer = ThresholdClusterer {
        threshold: 0.55,
        min_cluster_size: 1,
    };
    let assignment = clusterer.cluster(&texts, &vectors).unwrap();
    assert_eq!(assignment.topic_ids, vec![0, 1, 0]);
}

#[test]
fn mismatched_vectors_are_an_error() {
    let texts = strings(&[COURIER, LOTTERY]);
    let vectors = tfidf_vectors(&strings(&[COURIER]));
    assert!(ThresholdClusterer::default().cluster(&texts, &vectors).is_err());
}

// ============================================================================
// Topic names
// ============================================================================

#[test]
fn topic_names_carry_id_and_keywords() {
    let texts = strings(&[COURIER, LOTTERY, COURIER, LOTTERY, COURIER]);
    let vectors = tfidf_vectors(&texts);
    let assignment = ThresholdClusterer::default().cluster(&texts, &vectors).unwrap();

    let courier = assignment.name_of(0);
    assert!(courier.starts_with("0_"), "got {courier}");
    assert_eq!(courier.split('_').count(), 5);
    assert!(courier.contains("courier") || courier.contains("parcel"));

    let lottery = assignment.name_of(1);
    assert!(lottery.starts_with("1_"), "got {lottery}");
}

#[test]
fn unnamed_topic_uses_fallback() {
    let assignment = TopicAssignment::default();
    assert_eq!(assignment.name_of(9), "Topic 9");
}

// ============================================================================
// assign_topics
// ============================================================================

struct BrokenEmbedder;

#[async_trait]
impl TextEmbedder for BrokenEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
        anyhow::bail!("model file missing")
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Returns one id too few, which assign_topics must reject.
struct ShortClusterer;

impl TopicClusterer for ShortClusterer {
    fn cluster(&self, texts: &[String], _vectors: &[Vec<f64>]) -> Result<TopicAssignment> {
        Ok(TopicAssignment {
            topic_ids: vec![0; texts.len().saturating_sub(1)],
            names: Default::default(),
        })
    }
}

#[tokio::test]
async fn empty_input_assigns_nothing() {
    let assignment = assign_topics(&BrokenEmbedder, &ThresholdClusterer::default(), &[])
        .await
        .unwrap();
    assert!(assignment.topic_ids.is_empty());
    assert!(assignment.names.is_empty());
}

#[tokio::test]
async fn one_id_per_text_in_input_order() {
    let texts = strings(&[LOTTERY, COURIER, LOTTERY]);
    let assignment = assign_topics(&TfIdfEmbedder, &ThresholdClusterer::default(), &texts)
        .await
        .unwrap();
    assert_eq!(assignment.topic_ids, vec![0, NOISE_TOPIC, 0]);
}

#[tokio::test]
async fn embedder_failure_propagates() {
    let texts = strings(&[COURIER]);
    let err = assign_topics(&BrokenEmbedder, &ThresholdClusterer::default(), &texts)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("model file missing"));
}

#[tokio::test]
async fn short_assignment_is_rejected() {
    let texts = strings(&[COURIER, LOTTERY]);
    let result = assign_topics(&TfIdfEmbedder, &ShortClusterer, &texts).await;
    assert!(result.is_err());
}
