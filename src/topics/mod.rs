// Topic assignment: embed every incident, then cluster the vectors.
//
// SentenceEmbedder (ONNX) is the default embedder; TfIdfEmbedder is the
// fallback when the model isn't downloaded. ThresholdClusterer groups the
// vectors and names each topic with c-TF-IDF keywords.

pub mod cluster;
pub mod embeddings;
pub mod tfidf;
pub mod traits;

use anyhow::{Context, Result};
use tracing::info;

use traits::{TextEmbedder, TopicAssignment, TopicClusterer};

/// Assign one topic id per text (input order) plus the topic name table.
pub async fn assign_topics(
    embedder: &dyn TextEmbedder,
    clusterer: &dyn TopicClusterer,
    texts: &[String],
) -> Result<TopicAssignment> {
    if texts.is_empty() {
        return Ok(TopicAssignment::default());
    }

    let vectors = embedder
        .embed_batch(texts)
        .await
        .with_context(|| format!("{} embedding failed", embedder.name()))?;
    let assignment = clusterer.cluster(texts, &vectors)?;

    anyhow::ensure!(
        assignment.topic_ids.len() == texts.len(),
        "clusterer returned {} topic ids for {} texts",
        assignment.topic_ids.len(),
        texts.len()
    );

    info!(
        embedder = embedder.name(),
        topics = assignment.names.len(),
        "Assigned topics"
    );

    Ok(assignment)
}
