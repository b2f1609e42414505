// Embedding and clustering traits: the topic-assignment boundary.
//
// The pipeline only needs "one topic id per text, plus a name per id".
// TextEmbedder turns texts into vectors (ONNX sentence model, or batch-local
// TF-IDF when the model isn't downloaded); TopicClusterer groups the vectors.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

/// Topic id for incidents that didn't join any cluster.
pub const NOISE_TOPIC: i64 = -1;

/// Per-text topic ids (same order as the input texts) plus display names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicAssignment {
    pub topic_ids: Vec<i64>,
    pub names: BTreeMap<i64, String>,
}

impl TopicAssignment {
    /// Display name for a topic, or `"Topic <id>"` when none was generated.
    pub fn name_of(&self, topic_id: i64) -> String {
        topic_display_name(&self.names, topic_id)
    }
}

/// Name lookup with the `"Topic <id>"` fallback.
pub fn topic_display_name(names: &BTreeMap<i64, String>, topic_id: i64) -> String {
    names
        .get(&topic_id)
        .cloned()
        .unwrap_or_else(|| format!("Topic {topic_id}"))
}

/// Trait for turning texts into dense vectors. Async because the ONNX
/// backend offloads inference to the blocking pool.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed every text, returning vectors in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Backend name for logs and `status` output.
    fn name(&self) -> &'static str;
}

/// Trait for grouping embedded texts into topics.
pub trait TopicClusterer: Send + Sync {
    /// Assign a topic id to each text. `vectors[i]` embeds `texts[i]`.
    fn cluster(&self, texts: &[String], vectors: &[Vec<f64>]) -> Result<TopicAssignment>;
}
