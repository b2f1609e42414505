// Sentence embeddings with all-MiniLM-L6-v2.
//
// Incident reports describing the same scam rarely share exact wording
// ("parcel stuck at customs" vs "courier wants a redelivery fee"). Sentence
// embeddings put those close together; cosine similarity on the vectors
// drives the threshold clusterer.
//
// Runs locally via ONNX with mean pooling over the attention mask.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::TextEmbedder;
use crate::encoding::PaddedBatch;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// The model was trained on 256-token windows.
const MAX_EMBED_TOKENS: usize = 256;

/// Sentence embedder using a local ONNX model. Arc<Mutex<Session>> so the
/// forward pass can run in spawn_blocking.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl SentenceEmbedder {
    /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                anyhow::bail!(
                    "Embedding model file not found: {}\nRun `scamwatch download-model` to download it.",
                    path.display()
                );
            }
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_EMBED_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!(
            "Loaded sentence embedding model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextEmbedder for SentenceEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }

    fn name(&self) -> &'static str {
        "minilm-onnx"
    }
}

/// Tokenize, run the model, and mean-pool. Called from spawn_blocking.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    // MiniLM pads with id 0 and uses a single segment
    let batch = PaddedBatch::from_encodings(&encodings, 0);
    if batch.is_empty() {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch.rows]);
    }

    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => batch.ids_tensor()?,
                "attention_mask" => batch.mask_tensor()?,
                "token_type_ids" => batch.type_tensor()?
            })
            .context("Embedding ONNX inference failed")?;

        // last_hidden_state: [rows, seq_len, EMBEDDING_DIM]
        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;
        data.to_vec()
    };

    anyhow::ensure!(
        hidden_states.len() == batch.rows * batch.seq_len * EMBEDDING_DIM,
        "unexpected hidden state size {}",
        hidden_states.len()
    );

    debug!(rows = batch.rows, seq_len = batch.seq_len, "Computed sentence embeddings");

    Ok(mean_pool(&hidden_states, &batch.attention_mask, batch.seq_len))
}

/// Average each row's token vectors over positions where the mask is set.
/// Rows with an all-zero mask pool to the zero vector.
fn mean_pool(hidden_states: &[f32], attention_mask: &[i64], seq_len: usize) -> Vec<Vec<f64>> {
    hidden_states
        .chunks(seq_len * EMBEDDING_DIM)
        .zip(attention_mask.chunks(seq_len))
        .map(|(row, mask)| {
            let mut pooled = vec![0.0_f64; EMBEDDING_DIM];
            let mut kept = 0usize;
            for (token, _) in row
                .chunks(EMBEDDING_DIM)
                .zip(mask)
                .filter(|(_, m)| **m > 0)
            {
                kept += 1;
                for (acc, &v) in pooled.iter_mut().zip(token) {
                    *acc += f64::from(v);
                }
            }
            if kept > 0 {
                pooled.iter_mut().for_each(|v| *v /= kept as f64);
            }
            pooled
        })
        .collect()
}

/// Cosine similarity clamped to 0.0..=1.0. Mismatched or zero vectors score 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_ignores_padding() {
        // One row, two positions; second is padding with a huge value
        let mut hidden = vec![1.0_f32; EMBEDDING_DIM];
        hidden.extend(vec![100.0_f32; EMBEDDING_DIM]);
        let pooled = mean_pool(&hidden, &[1, 0], 2);
        assert_eq!(pooled.len(), 1);
        assert!(pooled[0].iter().all(|&v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_mean_pool_averages_tokens() {
        let mut hidden = vec![2.0_f32; EMBEDDING_DIM];
        hidden.extend(vec![4.0_f32; EMBEDDING_DIM]);
        let pooled = mean_pool(&hidden, &[1, 1], 2);
        assert!((pooled[0][0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let sim = cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]);
        assert!(sim.abs() < f64::EPSILON);
    }

    #[test]
    fn test_cosine_mismatched_dimensions() {
        let sim = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(sim.abs() < f64::EPSILON, "Mismatched dims should return 0.0");
    }

    #[test]
    fn test_cosine_opposite_clamps_to_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!(sim.abs() < f64::EPSILON);
    }
}
