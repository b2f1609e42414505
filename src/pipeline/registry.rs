// Process-wide model registry: load every backend once, on first use.
//
// The registry holds a loader instead of loaded models, so constructing a
// Pipeline is free and an empty batch never touches model files. The first
// non-empty batch runs the loader on the blocking pool; later batches reuse
// the same Arc<Models>.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::classify::onnx::OnnxZeroShotClassifier;
use crate::classify::traits::ZeroShotClassifier;
use crate::config::{ClassifierBackend, Config, SummarizerBackend};
use crate::download;
use crate::inference::hf::HfInferenceClient;
use crate::summarize::lead::LeadSentenceSummarizer;
use crate::summarize::traits::{AbstractiveSummarizer, NoopSummarizer};
use crate::topics::cluster::ThresholdClusterer;
use crate::topics::embeddings::SentenceEmbedder;
use crate::topics::tfidf::TfIdfEmbedder;
use crate::topics::traits::{TextEmbedder, TopicClusterer};

/// The four capability backends a run needs.
pub struct Models {
    pub classifier: Box<dyn ZeroShotClassifier>,
    pub summarizer: Box<dyn AbstractiveSummarizer>,
    pub embedder: Box<dyn TextEmbedder>,
    pub clusterer: Box<dyn TopicClusterer>,
}

type Loader = Arc<dyn Fn() -> Result<Models> + Send + Sync>;

/// One-shot lazy initializer for `Models`.
pub struct ModelRegistry {
    cell: OnceCell<Arc<Models>>,
    loader: Loader,
}

impl ModelRegistry {
    /// Registry that builds backends from configuration on first use.
    pub fn from_config(config: Config) -> Self {
        Self::with_loader(move || load_models(&config))
    }

    /// Registry with a custom loader. Runs at most once successfully.
    pub fn with_loader(loader: impl Fn() -> Result<Models> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceCell::new(),
            loader: Arc::new(loader),
        }
    }

    /// Registry around backends that are already built.
    pub fn preloaded(models: Models) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(models))),
            loader: Arc::new(|| -> Result<Models> { anyhow::bail!("models are preloaded") }),
        }
    }

    /// Whether models have been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Get the models, loading them if this is the first call.
    pub async fn get(&self) -> Result<Arc<Models>> {
        let models = self
            .cell
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let models = tokio::task::spawn_blocking(move || loader())
                    .await
                    .context("model loader panicked")??;
                Ok::<_, anyhow::Error>(Arc::new(models))
            })
            .await?;
        Ok(Arc::clone(models))
    }
}

/// Build backends according to configuration.
pub fn load_models(config: &Config) -> Result<Models> {
    config.require_classifier()?;
    config.require_summarizer()?;

    Ok(Models {
        classifier: create_classifier(config)?,
        summarizer: create_summarizer(config)?,
        embedder: create_embedder(config),
        clusterer: Box::new(ThresholdClusterer {
            threshold: config.cluster_threshold,
            min_cluster_size: config.min_cluster_size,
        }),
    })
}

fn create_classifier(config: &Config) -> Result<Box<dyn ZeroShotClassifier>> {
    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            info!("Using local ONNX zero-shot classifier");
            let dir = download::nli_model_dir(&config.model_dir);
            Ok(Box::new(OnnxZeroShotClassifier::load(&dir)?))
        }
        ClassifierBackend::Hf => {
            info!(model = %config.hf_zero_shot_model, "Using hosted zero-shot classifier");
            Ok(Box::new(HfInferenceClient::new(config.hf_settings())?))
        }
    }
}

fn create_summarizer(config: &Config) -> Result<Box<dyn AbstractiveSummarizer>> {
    match config.summarizer_backend {
        SummarizerBackend::Hf => {
            info!(model = %config.hf_summary_model, "Using hosted summarizer");
            Ok(Box::new(HfInferenceClient::new(config.hf_settings())?))
        }
        SummarizerBackend::Lead => {
            info!("Using extractive lead-sentence summarizer");
            Ok(Box::new(LeadSentenceSummarizer))
        }
        SummarizerBackend::Off => {
            info!("Abstractive summarization disabled");
            Ok(Box::new(NoopSummarizer))
        }
    }
}

/// Sentence embedder when its model is downloaded, TF-IDF otherwise.
fn create_embedder(config: &Config) -> Box<dyn TextEmbedder> {
    if !download::embedding_files_present(&config.model_dir) {
        info!("Embedding model not downloaded, clustering on TF-IDF vectors");
        return Box::new(TfIdfEmbedder);
    }

    match SentenceEmbedder::load(&download::embedding_model_dir(&config.model_dir)) {
        Ok(embedder) => {
            info!("Loaded sentence embedding model");
            Box::new(embedder)
        }
        Err(e) => {
            warn!("Failed to load embedding model, falling back to TF-IDF: {e}");
            Box::new(TfIdfEmbedder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::traits::LabelScore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct First;

    #[async_trait]
    impl ZeroShotClassifier for First {
        async fn classify(&self, _text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
            Ok(labels.iter().map(|l| LabelScore::new(l.clone(), 0.5)).collect())
        }

        fn name(&self) -> &'static str {
            "first"
        }
    }

    fn models() -> Models {
        Models {
            classifier: Box::new(First),
            summarizer: Box::new(NoopSummarizer),
            embedder: Box::new(TfIdfEmbedder),
            clusterer: Box::new(ThresholdClusterer::default()),
        }
    }

    #[tokio::test]
    async fn test_loader_runs_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let registry = ModelRegistry::with_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(models())
        });

        assert!(!registry.is_loaded());
        let a = registry.get().await.unwrap();
        let b = registry.get().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let registry = ModelRegistry::with_loader(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("model files missing");
            }
            Ok(models())
        });

        assert!(registry.get().await.is_err());
        assert!(registry.get().await.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded_never_calls_loader() {
        let registry = ModelRegistry::preloaded(models());
        assert!(registry.is_loaded());
        assert!(registry.get().await.is_ok());
    }
}
