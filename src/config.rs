use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::inference::hf::HfSettings;
use crate::topics::cluster::{DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_THRESHOLD};

pub const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_ZERO_SHOT_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_REQUESTS_PER_SECOND: f64 = 4.0;

/// Which zero-shot classification backend to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX NLI model (default), no token needed
    Onnx,
    /// Hosted inference API, requires HF_API_TOKEN
    Hf,
}

/// Which summarization backend the policy consults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummarizerBackend {
    /// Hosted abstractive summarization
    Hf,
    /// Local extractive lead sentences
    Lead,
    /// No backend; long texts always use the truncation fallback
    Off,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every setting has a
/// default, so `analyze` works out of the box once models are downloaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier_backend: ClassifierBackend,
    pub summarizer_backend: SummarizerBackend,
    /// Directory containing the ONNX model subdirectories
    pub model_dir: PathBuf,
    pub hf_api_token: String,
    pub hf_api_url: String,
    pub hf_zero_shot_model: String,
    pub hf_summary_model: String,
    pub hf_requests_per_second: f64,
    /// Incidents enriched in parallel
    pub concurrency: usize,
    pub cluster_threshold: f64,
    pub min_cluster_size: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let classifier_backend = match get("SCAMWATCH_CLASSIFIER").as_deref() {
            Some("hf") => ClassifierBackend::Hf,
            // "onnx" or unset both default to ONNX
            _ => ClassifierBackend::Onnx,
        };

        let hf_api_token = get("HF_API_TOKEN").unwrap_or_default();

        let summarizer_backend = match get("SCAMWATCH_SUMMARIZER").as_deref() {
            Some("hf") => SummarizerBackend::Hf,
            Some("lead") => SummarizerBackend::Lead,
            Some("none") => SummarizerBackend::Off,
            _ if !hf_api_token.is_empty() => SummarizerBackend::Hf,
            _ => SummarizerBackend::Lead,
        };

        let model_dir = get("SCAMWATCH_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(crate::download::default_model_dir);

        let concurrency = parse_or(&get, "SCAMWATCH_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if concurrency == 0 {
            anyhow::bail!("SCAMWATCH_CONCURRENCY must be at least 1");
        }

        Ok(Self {
            classifier_backend,
            summarizer_backend,
            model_dir,
            hf_api_token,
            hf_api_url: get("HF_API_URL").unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
            hf_zero_shot_model: get("HF_ZERO_SHOT_MODEL")
                .unwrap_or_else(|| DEFAULT_ZERO_SHOT_MODEL.to_string()),
            hf_summary_model: get("HF_SUMMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            hf_requests_per_second: parse_or(
                &get,
                "HF_REQUESTS_PER_SECOND",
                DEFAULT_REQUESTS_PER_SECOND,
            )?,
            concurrency,
            cluster_threshold: parse_or(&get, "SCAMWATCH_CLUSTER_THRESHOLD", DEFAULT_THRESHOLD)?,
            min_cluster_size: parse_or(
                &get,
                "SCAMWATCH_MIN_CLUSTER_SIZE",
                DEFAULT_MIN_CLUSTER_SIZE,
            )?,
        })
    }

    /// Connection settings for the hosted inference client.
    pub fn hf_settings(&self) -> HfSettings {
        HfSettings {
            api_url: self.hf_api_url.clone(),
            api_token: self.hf_api_token.clone(),
            zero_shot_model: self.hf_zero_shot_model.clone(),
            summary_model: self.hf_summary_model.clone(),
            requests_per_second: self.hf_requests_per_second,
        }
    }

    /// Check that the HF API token is configured.
    pub fn require_hf_token(&self) -> Result<()> {
        if self.hf_api_token.is_empty() {
            anyhow::bail!(
                "HF_API_TOKEN not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Validate that the chosen classifier backend has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    /// For HF: API token must be set.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::download::nli_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "Zero-shot model files not found in {}\n\
                         Run `scamwatch download-model` to download them.\n\
                         Or set SCAMWATCH_CLASSIFIER=hf to use the hosted inference API instead.",
                        crate::download::nli_model_dir(&self.model_dir).display()
                    );
                }
                Ok(())
            }
            ClassifierBackend::Hf => self.require_hf_token(),
        }
    }

    /// Validate the summarizer backend. Only the hosted one has requirements.
    pub fn require_summarizer(&self) -> Result<()> {
        match self.summarizer_backend {
            SummarizerBackend::Hf => self.require_hf_token(),
            SummarizerBackend::Lead | SummarizerBackend::Off => Ok(()),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
