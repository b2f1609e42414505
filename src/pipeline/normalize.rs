// Batch parsing and incident normalization. Pure functions, no model calls.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::models::{NormalizedIncident, RawIncident};
use crate::trends::week::parse_timestamp;

/// Parse the raw input document into incidents.
///
/// Errors here are input errors: empty input, malformed JSON, a top-level
/// value that isn't an array, or an array element that isn't an object.
pub fn parse_batch(input: &str) -> Result<Vec<RawIncident>> {
    if input.trim().is_empty() {
        anyhow::bail!("No input provided");
    }

    let value: Value = serde_json::from_str(input).context("Invalid JSON input")?;
    let Value::Array(items) = value else {
        anyhow::bail!("Input must be a JSON array of incidents");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                anyhow::bail!("Incident at index {i} is not a JSON object");
            }
            serde_json::from_value(item).with_context(|| format!("Invalid incident at index {i}"))
        })
        .collect()
}

/// ISO-8601 form used for defaulted and report timestamps.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Normalize a whole batch; `now` fills in missing timestamps.
pub fn normalize_batch(batch: Vec<RawIncident>, now: DateTime<Utc>) -> Vec<NormalizedIncident> {
    let now = iso_timestamp(now);
    batch
        .into_iter()
        .enumerate()
        .map(|(index, raw)| normalize(index, raw, &now))
        .collect()
}

/// Normalize one incident at position `index`.
pub fn normalize(index: usize, raw: RawIncident, now: &str) -> NormalizedIncident {
    let id = raw
        .id
        .as_ref()
        .or(raw.record_id.as_ref())
        .map(value_text)
        .unwrap_or_else(|| index.to_string());

    let text = match &raw.text {
        Some(text) => value_text(text),
        None => format!(
            "{} {}",
            raw.title.as_ref().map(value_text).unwrap_or_default(),
            raw.description.as_ref().map(value_text).unwrap_or_default()
        ),
    }
    .trim()
    .to_string();

    let timestamp = raw
        .timestamp
        .unwrap_or_else(|| Value::String(now.to_string()));
    let parsed_at = timestamp.as_str().and_then(parse_timestamp);

    let region = raw
        .location
        .as_ref()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let severity = raw
        .severity
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    NormalizedIncident {
        id,
        text,
        timestamp,
        parsed_at,
        region,
        severity,
    }
}

/// Strings as-is; any other JSON value as its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
