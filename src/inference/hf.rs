// HuggingFace Inference API client.
//
// Implements both capability traits against hosted pipelines:
//   zero-shot-classification  POST {base}/models/{zero_shot_model}
//   summarization             POST {base}/models/{summary_model}
//
// The zero-shot endpoint has answered in two shapes over time
// ({labels, scores} and [{label, score}]); both are accepted.
//
// API docs: https://huggingface.co/docs/api-inference/tasks/zero-shot-classification

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use crate::classify::traits::{rank_descending, LabelScore, ZeroShotClassifier};
use crate::summarize::traits::AbstractiveSummarizer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the hosted inference API.
#[derive(Debug, Clone)]
pub struct HfSettings {
    pub api_url: String,
    pub api_token: String,
    pub zero_shot_model: String,
    pub summary_model: String,
    pub requests_per_second: f64,
}

/// Hosted inference client. Clone-cheap; clones share the rate limiter.
#[derive(Clone)]
pub struct HfInferenceClient {
    client: Client,
    settings: HfSettings,
    rate_limiter: RateLimiter,
}

impl HfInferenceClient {
    pub fn new(settings: HfSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(settings.requests_per_second),
            settings,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.settings.api_url.trim_end_matches('/'),
            model
        )
    }

    /// POST a JSON body to a model endpoint and decode the response.
    async fn post<B, R>(&self, model: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de> + Send,
    {
        self.rate_limiter.acquire().await;

        let mut request = self.client.post(self.model_url(model)).json(body);
        if !self.settings.api_token.is_empty() {
            request = request.bearer_auth(&self.settings.api_token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to call inference API for {model}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API returned {} for {}: {}", status, model, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse inference API response for {model}"))
    }
}

#[async_trait]
impl ZeroShotClassifier for HfInferenceClient {
    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
        };

        let response: ZeroShotResponse = self
            .post(&self.settings.zero_shot_model, &request)
            .await?;
        let mut scores = response.into_scores()?;
        rank_descending(&mut scores);

        debug!(
            top = ?scores.first().map(|s| s.label.as_str()),
            candidates = candidate_labels.len(),
            text_preview = %crate::output::truncate_chars(text, 50),
            "Hosted zero-shot ranked labels"
        );

        Ok(scores)
    }

    fn name(&self) -> &'static str {
        "hf-zero-shot"
    }
}

#[async_trait]
impl AbstractiveSummarizer for HfInferenceClient {
    async fn summarize(&self, text: &str, max_words: usize, min_words: usize) -> Result<String> {
        let request = SummaryRequest {
            inputs: text,
            parameters: SummaryParameters {
                max_length: max_words,
                min_length: min_words,
                do_sample: false,
            },
        };

        let response: Vec<SummaryItem> = self.post(&self.settings.summary_model, &request).await?;
        let summary = response
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or_else(|| anyhow::anyhow!("Inference API returned no summary"))?;

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "hf-summarization"
    }
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns { labels: Vec<String>, scores: Vec<f64> },
    Rows(Vec<LabelScore>),
}

impl ZeroShotResponse {
    fn into_scores(self) -> Result<Vec<LabelScore>> {
        match self {
            ZeroShotResponse::Columns { labels, scores } => {
                anyhow::ensure!(
                    labels.len() == scores.len(),
                    "zero-shot response has {} labels but {} scores",
                    labels.len(),
                    scores.len()
                );
                Ok(labels
                    .into_iter()
                    .zip(scores)
                    .map(|(label, score)| LabelScore { label, score })
                    .collect())
            }
            ZeroShotResponse::Rows(rows) => Ok(rows),
        }
    }
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
    parameters: SummaryParameters,
}

#[derive(Serialize)]
struct SummaryParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}
