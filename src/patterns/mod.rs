// Scam patterns: one summary record per topic, plus run-level insights.
//
// A pattern gathers everything the dashboard shows for a topic: keywords,
// the dominant severity, where and when incidents happened, and a trend
// score that favours large, confidently classified topics.

use std::collections::{BTreeMap, HashMap};

use chrono::Timelike;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use serde::Serialize;
use stop_words::{get, LANGUAGE};

use crate::pipeline::models::EnrichedIncident;
use crate::taxonomy::category_code;
use crate::topics::tfidf::tokenize;

/// Keywords kept per pattern.
pub const MAX_KEYWORDS: usize = 20;

/// Severity assumed for incidents that don't carry one.
pub const DEFAULT_SEVERITY: &str = "medium";

const FREQUENCY_WEIGHT: f64 = 0.7;
const CONFIDENCE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordWeight {
    pub word: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicPattern {
    pub pattern_id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<KeywordWeight>,
    pub severity: String,
    pub category: String,
    pub confidence: f64,
    pub frequency: usize,
    pub trend_score: f64,
    pub regions: Vec<RegionCount>,
    pub hours: Vec<HourCount>,
    pub incident_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternInsights {
    pub category_distribution: Vec<LabelCount>,
    pub severity_distribution: Vec<LabelCount>,
}

/// Build one pattern per topic id, highest trend score first.
pub fn build_patterns(incidents: &[EnrichedIncident]) -> Vec<TopicPattern> {
    let mut groups: BTreeMap<i64, Vec<&EnrichedIncident>> = BTreeMap::new();
    for incident in incidents {
        groups.entry(incident.topic_id).or_default().push(incident);
    }

    let mut patterns: Vec<TopicPattern> = groups
        .into_iter()
        .map(|(topic_id, members)| build_pattern(topic_id, &members))
        .collect();

    patterns.sort_by(|a, b| {
        b.trend_score
            .partial_cmp(&a.trend_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    patterns
}

fn build_pattern(topic_id: i64, members: &[&EnrichedIncident]) -> TopicPattern {
    let first = members[0];
    let frequency = members.len();
    let confidence = average_confidence(members);

    TopicPattern {
        pattern_id: format!("topic_{topic_id}"),
        name: first.topic_name.clone(),
        description: first.summary.clone(),
        keywords: keywords(members),
        severity: majority_severity(members),
        category: category_code(&first.parent_category).to_string(),
        confidence,
        frequency,
        trend_score: frequency as f64 * FREQUENCY_WEIGHT + confidence * CONFIDENCE_WEIGHT,
        regions: region_counts(members),
        hours: hour_counts(members),
        incident_ids: members.iter().map(|m| m.id.clone()).collect(),
    }
}

/// Mean of child confidence, using parent confidence where the child's is 0.
fn average_confidence(members: &[&EnrichedIncident]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total: f64 = members
        .iter()
        .map(|m| {
            if m.child_confidence > 0.0 {
                m.child_confidence
            } else {
                m.parent_confidence
            }
        })
        .sum();
    total / members.len() as f64
}

/// Most common severity; ties go to whichever appeared first.
fn majority_severity(members: &[&EnrichedIncident]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for member in members {
        let severity = member.severity.as_deref().unwrap_or(DEFAULT_SEVERITY);
        match counts.iter_mut().find(|(s, _)| *s == severity) {
            Some((_, n)) => *n += 1,
            None => counts.push((severity, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (severity, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((severity, n));
        }
    }
    best.map(|(s, _)| s)
        .unwrap_or(DEFAULT_SEVERITY)
        .to_string()
}

/// TF-IDF keywords across member texts, weighted relative to the top score.
///
/// When TF-IDF can't separate anything (one short text, identical texts),
/// falls back to raw term frequency.
fn keywords(members: &[&EnrichedIncident]) -> Vec<KeywordWeight> {
    let docs: Vec<String> = members
        .iter()
        .map(|m| m.text.clone())
        .filter(|t| !t.trim().is_empty())
        .collect();
    if docs.is_empty() {
        return Vec::new();
    }

    // Upper bound on distinct terms, so nothing is cut before our own tie-break
    let vocabulary_bound: usize = docs.iter().map(|d| d.split_whitespace().count()).sum();

    let stop_words: Vec<String> = get(LANGUAGE::English);
    let tfidf = TfIdf::new(TfIdfParams::UnprocessedDocuments(&docs, &stop_words, None));
    let scored: Vec<(String, f64)> = tfidf
        .get_ranked_word_scores(vocabulary_bound.max(1))
        .into_iter()
        .map(|(word, score)| (word, score as f64))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    let scored = if scored.is_empty() {
        term_frequencies(&docs)
    } else {
        scored
    };
    normalize_keywords(scored)
}

fn term_frequencies(docs: &[String]) -> Vec<(String, f64)> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for doc in docs {
        for word in tokenize(doc) {
            *counts.entry(word).or_insert(0.0) += 1.0;
        }
    }
    counts.into_iter().collect()
}

/// Sort by score (ties alphabetical), keep the top `MAX_KEYWORDS`, scale
/// weights so the best keyword is 1.0.
fn normalize_keywords(mut scored: Vec<(String, f64)>) -> Vec<KeywordWeight> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(MAX_KEYWORDS);

    let max = scored.first().map(|(_, s)| *s).unwrap_or(0.0);
    if max <= 0.0 {
        return Vec::new();
    }
    scored
        .into_iter()
        .map(|(word, score)| KeywordWeight {
            word,
            weight: score / max,
        })
        .collect()
}

fn region_counts(members: &[&EnrichedIncident]) -> Vec<RegionCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for member in members {
        let region = if member.region.trim().is_empty() {
            "Unknown"
        } else {
            member.region.as_str()
        };
        *counts.entry(region).or_insert(0) += 1;
    }

    let mut regions: Vec<RegionCount> = counts
        .into_iter()
        .map(|(region, count)| RegionCount {
            region: region.to_string(),
            count,
        })
        .collect();
    regions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.region.cmp(&b.region)));
    regions
}

fn hour_counts(members: &[&EnrichedIncident]) -> Vec<HourCount> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for at in members.iter().filter_map(|m| m.parsed_at) {
        *counts.entry(at.hour()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// Category and severity distributions over the run's patterns.
pub fn insights(patterns: &[TopicPattern]) -> PatternInsights {
    PatternInsights {
        category_distribution: distribution(patterns.iter().map(|p| p.category.as_str())),
        severity_distribution: distribution(patterns.iter().map(|p| p.severity.as_str())),
    }
}

fn distribution<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut out: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}
