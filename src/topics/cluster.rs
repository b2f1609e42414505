// Threshold clustering over embedding vectors.
//
// Greedy seed-and-grow: walk texts in input order; each unassigned text
// seeds a cluster and pulls in every later unassigned text whose cosine
// similarity to the seed clears the threshold. Clusters below the minimum
// size are noise. Deterministic for a given input order.

use anyhow::Result;
use tracing::debug;

use super::embeddings::cosine_similarity;
use super::tfidf::topic_names;
use super::traits::{TopicAssignment, TopicClusterer, NOISE_TOPIC};

pub const DEFAULT_THRESHOLD: f64 = 0.55;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

#[derive(Debug, Clone)]
pub struct ThresholdClusterer {
    pub threshold: f64,
    pub min_cluster_size: usize,
}

impl Default for ThresholdClusterer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

impl TopicClusterer for ThresholdClusterer {
    fn cluster(&self, texts: &[String], vectors: &[Vec<f64>]) -> Result<TopicAssignment> {
        anyhow::ensure!(
            texts.len() == vectors.len(),
            "got {} texts but {} vectors",
            texts.len(),
            vectors.len()
        );

        let groups = grow_groups(vectors, self.threshold);
        let topic_ids = number_groups(groups, vectors.len(), self.min_cluster_size);
        let names = topic_names(texts, &topic_ids);

        debug!(
            texts = texts.len(),
            topics = names.keys().filter(|&&id| id != NOISE_TOPIC).count(),
            noise = topic_ids.iter().filter(|&&id| id == NOISE_TOPIC).count(),
            "Clustered incidents"
        );

        Ok(TopicAssignment { topic_ids, names })
    }
}

/// Seed-and-grow groups of indices, in seed order.
fn grow_groups(vectors: &[Vec<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; vectors.len()];
    let mut groups = Vec::new();

    for seed in 0..vectors.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        for other in (seed + 1)..vectors.len() {
            if !assigned[other] && cosine_similarity(&vectors[seed], &vectors[other]) >= threshold {
                assigned[other] = true;
                members.push(other);
            }
        }
        groups.push(members);
    }

    groups
}

/// Number surviving groups 0.. by size descending (stable, so ties keep
/// seed order); everything else is noise.
fn number_groups(mut groups: Vec<Vec<usize>>, len: usize, min_size: usize) -> Vec<i64> {
    groups.retain(|g| g.len() >= min_size);
    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut ids = vec![NOISE_TOPIC; len];
    for (topic, members) in groups.iter().enumerate() {
        for &i in members {
            ids[i] = topic as i64;
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_grow_from_seed() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.9, 0.1],
            vec![0.1, 0.9],
            vec![1.0, 0.05],
        ];
        let groups = grow_groups(&vectors, 0.9);
        assert_eq!(groups, vec![vec![0, 2, 4], vec![1, 3]]);
    }

    #[test]
    fn test_larger_cluster_gets_lower_id() {
        let groups = vec![vec![0, 1], vec![2, 3, 4], vec![5]];
        let ids = number_groups(groups, 6, 2);
        assert_eq!(ids, vec![1, 1, 0, 0, 0, NOISE_TOPIC]);
    }

    #[test]
    fn test_equal_sizes_keep_seed_order() {
        let groups = vec![vec![0, 3], vec![1, 2]];
        assert_eq!(number_groups(groups, 4, 2), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let clusterer = ThresholdClusterer::default();
        let result = clusterer.cluster(&["a".to_string()], &[]);
        assert!(result.is_err());
    }
}
