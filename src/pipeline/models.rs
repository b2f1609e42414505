// Wire types: the incident batch coming in and the report going out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::patterns::{PatternInsights, TopicPattern};
use crate::trends::TrendRecord;

/// One incident as submitted. Every field is optional and unknown fields
/// are ignored; JSON `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncident {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "_id")]
    pub record_id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub severity: Option<Value>,
}

/// An incident after normalization. Read-only for every later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIncident {
    pub id: String,
    pub text: String,
    /// The submitted timestamp value, or the run's start time.
    pub timestamp: Value,
    /// `timestamp` parsed once; None for non-strings and unparseable values.
    pub parsed_at: Option<DateTime<Utc>>,
    pub region: String,
    pub severity: Option<String>,
}

/// Per-incident output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedIncident {
    pub id: String,
    pub text: String,
    pub parent_category: String,
    pub child_label: String,
    pub parent_confidence: f64,
    pub child_confidence: f64,
    pub summary: String,
    pub topic_id: i64,
    pub topic_name: String,
    pub timestamp: Value,
    pub region: String,
    #[serde(skip)]
    pub severity: Option<String>,
    #[serde(skip)]
    pub parsed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub success: bool,
    pub processed_incidents: usize,
    pub incidents: Vec<EnrichedIncident>,
    pub trending_topics: Vec<TrendRecord>,
    pub total_patterns: usize,
    pub analysis_timestamp: String,
    pub topic_patterns: Vec<TopicPattern>,
    pub insights: PatternInsights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

/// What `process` hands back: a full report or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Report(Box<Report>),
    Error(ErrorReport),
}

impl Outcome {
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error(ErrorReport {
            error: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Report(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::Error(_) => None,
        }
    }
}
