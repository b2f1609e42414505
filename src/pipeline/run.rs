// Batch orchestration: normalize, enrich, cluster, score trends, report.
//
// Per-incident labelling and summarizing run on a bounded, order-preserving
// stream. Clustering needs every text at once, so it waits for the whole
// stream (join barrier). Any error or panic past input validation becomes
// `{"error": "Processing failed: ..."}`.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tracing::{error, info};

use super::models::{EnrichedIncident, NormalizedIncident, Outcome, RawIncident, Report};
use super::normalize::{iso_timestamp, normalize_batch};
use super::registry::ModelRegistry;
use crate::classify::hierarchical::{Classification, HierarchicalLabeler};
use crate::patterns;
use crate::summarize::Summarizer;
use crate::taxonomy::Taxonomy;
use crate::topics::assign_topics;
use crate::trends::{compute_trends, Observation};

pub const EMPTY_BATCH_ERROR: &str = "No incidents provided";

/// Owns the taxonomy and the lazily loaded models for the process.
pub struct Pipeline {
    registry: ModelRegistry,
    taxonomy: Taxonomy,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(registry: ModelRegistry, taxonomy: Taxonomy, concurrency: usize) -> Self {
        Self {
            registry,
            taxonomy,
            concurrency: concurrency.max(1),
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Process one batch. Never fails: problems come back as `Outcome::Error`.
    pub async fn process(&self, batch: Vec<RawIncident>) -> Outcome {
        if batch.is_empty() {
            return Outcome::error(EMPTY_BATCH_ERROR);
        }

        match AssertUnwindSafe(self.run(batch)).catch_unwind().await {
            Ok(Ok(report)) => Outcome::Report(Box::new(report)),
            Ok(Err(e)) => {
                error!(error = %format!("{e:#}"), "Processing failed");
                Outcome::error(format!("Processing failed: {e:#}"))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(panic = %message, "Processing panicked");
                Outcome::error(format!("Processing failed: {message}"))
            }
        }
    }

    async fn run(&self, batch: Vec<RawIncident>) -> Result<Report> {
        let incidents = normalize_batch(batch, Utc::now());
        info!(incidents = incidents.len(), "Processing batch");

        let models = self.registry.get().await.context("Failed to load models")?;

        let labeler = HierarchicalLabeler::new(models.classifier.as_ref(), &self.taxonomy);
        let summarizer = Summarizer::new(models.summarizer.as_ref(), &self.taxonomy);

        let labelled: Vec<(Classification, String)> = stream::iter(incidents.iter().map(|incident| {
            let labeler = &labeler;
            let summarizer = &summarizer;
            async move {
                let classification = labeler
                    .classify(&incident.text)
                    .await
                    .with_context(|| format!("Classification failed for incident {}", incident.id))?;
                let summary = summarizer
                    .summarize(&classification.child_label, &incident.text)
                    .await;
                Ok::<_, anyhow::Error>((classification, summary))
            }
        }))
        .buffered(self.concurrency)
        .collect::<Vec<Result<_>>>()
        .await
        .into_iter()
        .collect::<Result<_>>()?;

        // Join barrier: clustering sees every text at once
        let texts: Vec<String> = incidents.iter().map(|i| i.text.clone()).collect();
        let topics = assign_topics(models.embedder.as_ref(), models.clusterer.as_ref(), &texts)
            .await
            .context("Topic assignment failed")?;

        let enriched: Vec<EnrichedIncident> = incidents
            .into_iter()
            .zip(labelled)
            .zip(&topics.topic_ids)
            .map(|((incident, (classification, summary)), &topic_id)| {
                enrich(incident, classification, summary, topic_id, topics.name_of(topic_id))
            })
            .collect();

        let observations: Vec<Observation> = enriched
            .iter()
            .map(|i| Observation {
                topic_id: i.topic_id,
                timestamp: i.parsed_at,
            })
            .collect();
        let trends = compute_trends(&observations, &topics.names);

        let topic_patterns = patterns::build_patterns(&enriched);
        let insights = patterns::insights(&topic_patterns);

        info!(
            incidents = enriched.len(),
            trending = trends.trending.len(),
            qualifying = trends.total_patterns,
            patterns = topic_patterns.len(),
            "Batch processed"
        );

        Ok(Report {
            success: true,
            processed_incidents: enriched.len(),
            incidents: enriched,
            trending_topics: trends.trending,
            total_patterns: trends.total_patterns,
            analysis_timestamp: iso_timestamp(Utc::now()),
            topic_patterns,
            insights,
        })
    }
}

fn enrich(
    incident: NormalizedIncident,
    classification: Classification,
    summary: String,
    topic_id: i64,
    topic_name: String,
) -> EnrichedIncident {
    EnrichedIncident {
        id: incident.id,
        text: incident.text,
        parent_category: classification.parent_category,
        child_label: classification.child_label,
        parent_confidence: classification.parent_confidence,
        child_confidence: classification.child_confidence,
        summary,
        topic_id,
        topic_name,
        timestamp: incident.timestamp,
        region: incident.region,
        severity: incident.severity,
        parsed_at: incident.parsed_at,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_string()
    }
}
