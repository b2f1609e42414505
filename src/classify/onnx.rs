// Local ONNX zero-shot classifier built on an NLI (MNLI) model.
//
// Zero-shot classification is posed as entailment: the incident text is the
// premise and "This example is {label}." is the hypothesis. Each candidate
// label becomes one premise/hypothesis pair; all pairs go through one forward
// pass. Single-label scores are a softmax over the entailment logits across
// candidates, so they sum to 1.0 for one call.
//
// Model: Xenova/distilbert-base-uncased-mnli (ONNX export)
// Files: model.onnx, tokenizer.json, config.json (for the label index map)

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::{rank_descending, LabelScore, ZeroShotClassifier};
use crate::encoding::PaddedBatch;

/// Hypothesis used for every candidate label. `{}` is replaced by the label.
pub const HYPOTHESIS_TEMPLATE: &str = "This example is {}.";

/// Longest premise+hypothesis pair fed to the model.
const MAX_SEQUENCE_TOKENS: usize = 512;

/// The subset of the HuggingFace `config.json` we need.
#[derive(Debug, Deserialize)]
struct NliModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
    #[serde(default)]
    model_type: String,
}

/// Local NLI-based zero-shot classifier. Session behind Arc<Mutex> so
/// inference can run inside spawn_blocking, same as the embedder.
pub struct OnnxZeroShotClassifier {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    entailment_index: usize,
    num_labels: usize,
    uses_token_type_ids: bool,
    pad_id: i64,
}

impl OnnxZeroShotClassifier {
    /// Load the NLI model, tokenizer and label map from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        for path in [&model_path, &tokenizer_path, &config_path] {
            if !path.exists() {
                anyhow::bail!(
                    "Zero-shot model file not found: {}\nRun `scamwatch download-model` to download it.",
                    path.display()
                );
            }
        }

        let config_text = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: NliModelConfig = serde_json::from_str(&config_text)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let entailment_index = entailment_index(&config.id2label)?;
        let num_labels = config.id2label.len();

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_SEQUENCE_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let pad_id = tokenizer
            .token_to_id("<pad>")
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0) as i64;

        debug!(
            model_type = %config.model_type,
            entailment_index,
            num_labels,
            "Loaded ONNX zero-shot model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            entailment_index,
            num_labels,
            uses_token_type_ids: config.model_type == "bert",
            pad_id,
        })
    }
}

#[async_trait]
impl ZeroShotClassifier for OnnxZeroShotClassifier {
    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>> {
        if candidate_labels.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let premise = text.to_string();
        let labels = candidate_labels.to_vec();
        let entailment_index = self.entailment_index;
        let num_labels = self.num_labels;
        let uses_token_type_ids = self.uses_token_type_ids;
        let pad_id = self.pad_id;

        tokio::task::spawn_blocking(move || {
            let encodings = labels
                .iter()
                .map(|label| {
                    let hypothesis = hypothesis_for(label);
                    tokenizer
                        .encode((premise.as_str(), hypothesis.as_str()), true)
                        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
                })
                .collect::<Result<Vec<_>>>()?;

            let batch = PaddedBatch::from_encodings(&encodings, pad_id);

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                // DistilBERT and BART exports take no segment ids
                let outputs = if uses_token_type_ids {
                    session.run(ort::inputs! {
                        "input_ids" => batch.ids_tensor()?,
                        "attention_mask" => batch.mask_tensor()?,
                        "token_type_ids" => batch.type_tensor()?
                    })
                } else {
                    session.run(ort::inputs! {
                        "input_ids" => batch.ids_tensor()?,
                        "attention_mask" => batch.mask_tensor()?
                    })
                }
                .context("ONNX zero-shot inference failed")?;

                // [rows, num_labels] raw NLI logits
                let (_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract logits tensor")?;
                data.to_vec()
            };

            anyhow::ensure!(
                logits.len() == batch.rows * num_labels,
                "unexpected logits length {}, expected {} x {}",
                logits.len(),
                batch.rows,
                num_labels
            );

            let entail: Vec<f64> = logits
                .chunks(num_labels)
                .map(|row| row[entailment_index] as f64)
                .collect();
            let probs = softmax(&entail);

            let mut scores: Vec<LabelScore> = labels
                .into_iter()
                .zip(probs)
                .map(|(label, score)| LabelScore { label, score })
                .collect();
            rank_descending(&mut scores);

            debug!(
                top = %scores[0].label,
                score = scores[0].score,
                candidates = batch.rows,
                text_preview = %crate::output::truncate_chars(&premise, 50),
                "ONNX zero-shot ranked labels"
            );

            Ok(scores)
        })
        .await
        .context("spawn_blocking panicked")?
    }

    fn name(&self) -> &'static str {
        "onnx-nli"
    }
}

/// Fill the hypothesis template for one candidate label.
fn hypothesis_for(label: &str) -> String {
    HYPOTHESIS_TEMPLATE.replace("{}", label)
}

/// Find the logit index whose label name starts with "entail" (case-insensitive).
fn entailment_index(id2label: &HashMap<String, String>) -> Result<usize> {
    for (idx, name) in id2label {
        if name.to_lowercase().starts_with("entail") {
            return idx
                .parse::<usize>()
                .with_context(|| format!("Invalid label index '{idx}' in config.json"));
        }
    }
    anyhow::bail!("config.json id2label has no entailment label; is this an NLI model?")
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id2label(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn test_entailment_index_distilbert_layout() {
        let map = id2label(&[("0", "ENTAILMENT"), ("1", "NEUTRAL"), ("2", "CONTRADICTION")]);
        assert_eq!(entailment_index(&map).unwrap(), 0);
    }

    #[test]
    fn test_entailment_index_roberta_layout() {
        let map = id2label(&[("0", "contradiction"), ("1", "neutral"), ("2", "entailment")]);
        assert_eq!(entailment_index(&map).unwrap(), 2);
    }

    #[test]
    fn test_entailment_index_missing() {
        let map = id2label(&[("0", "NEGATIVE"), ("1", "POSITIVE")]);
        assert!(entailment_index(&map).is_err());
    }

    #[test]
    fn test_hypothesis_template() {
        assert_eq!(hypothesis_for("UPI fraud"), "This example is UPI fraud.");
    }
}
