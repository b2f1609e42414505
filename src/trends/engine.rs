// Week-over-week topic trend scoring.
//
// Incidents are bucketed by (ISO week, topic). For every topic seen in at
// least two distinct weeks, the two most recent weeks are compared and the
// percent change is ranked. Only the top ten are reported, but the total
// count of qualifying topics is kept.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::week::iso_week;
use crate::topics::traits::topic_display_name;

/// Trending topics reported per run.
pub const TOP_TRENDS: usize = 10;

/// One incident's contribution to the weekly counts.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub topic_id: i64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// `topic id -> ISO week -> count`, rebuilt for every run.
#[derive(Debug, Default)]
pub struct WeeklyTopicCounts {
    counts: BTreeMap<i64, BTreeMap<u32, usize>>,
    unbucketed: usize,
}

impl WeeklyTopicCounts {
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut table = Self::default();
        for obs in observations {
            match obs.timestamp {
                Some(at) => {
                    *table
                        .counts
                        .entry(obs.topic_id)
                        .or_default()
                        .entry(iso_week(&at))
                        .or_insert(0) += 1;
                }
                None => table.unbucketed += 1,
            }
        }
        table
    }

    /// Incidents whose timestamp didn't parse.
    pub fn unbucketed(&self) -> usize {
        self.unbucketed
    }

    /// Weekly counts for one topic, ascending by week.
    pub fn weeks(&self, topic_id: i64) -> Vec<(u32, usize)> {
        self.counts
            .get(&topic_id)
            .map(|weeks| weeks.iter().map(|(&w, &c)| (w, c)).collect())
            .unwrap_or_default()
    }

    /// Topic ids in ascending order.
    pub fn topics(&self) -> impl Iterator<Item = i64> + '_ {
        self.counts.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRecord {
    pub topic_id: i64,
    pub topic_name: String,
    pub last_week_count: usize,
    pub prev_week_count: usize,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSummary {
    /// At most `TOP_TRENDS` records, highest percent change first.
    pub trending: Vec<TrendRecord>,
    /// Number of topics with at least two weeks of data, before truncation.
    pub total_patterns: usize,
}

/// Percent change from `prev` to `last`, rounded to two decimals.
/// With no previous count: 100.0 if anything appeared, else 0.0.
pub fn percent_change(prev: usize, last: usize) -> f64 {
    let raw = if prev > 0 {
        (last as f64 - prev as f64) / prev as f64 * 100.0
    } else if last > 0 {
        100.0
    } else {
        0.0
    };
    round2(raw)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Rank week-over-week growth for every topic with at least two weeks.
pub fn compute_trends(observations: &[Observation], names: &BTreeMap<i64, String>) -> TrendSummary {
    let table = WeeklyTopicCounts::from_observations(observations);

    let mut records: Vec<TrendRecord> = table
        .topics()
        .filter_map(|topic_id| {
            let weeks = table.weeks(topic_id);
            if weeks.len() < 2 {
                return None;
            }
            let (_, prev) = weeks[weeks.len() - 2];
            let (_, last) = weeks[weeks.len() - 1];
            Some(TrendRecord {
                topic_id,
                topic_name: topic_display_name(names, topic_id),
                last_week_count: last,
                prev_week_count: prev,
                percent_change: percent_change(prev, last),
            })
        })
        .collect();

    let total_patterns = records.len();

    // Stable: equal percent and count keep ascending topic id order
    records.sort_by(|a, b| {
        b.percent_change
            .partial_cmp(&a.percent_change)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.last_week_count.cmp(&a.last_week_count))
    });
    records.truncate(TOP_TRENDS);

    debug!(
        qualifying = total_patterns,
        reported = records.len(),
        unbucketed = table.unbucketed(),
        "Computed weekly trends"
    );

    TrendSummary {
        trending: records,
        total_patterns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change_cases() {
        assert_eq!(percent_change(5, 0), -100.0);
        assert_eq!(percent_change(0, 3), 100.0);
        assert_eq!(percent_change(0, 0), 0.0);
        assert_eq!(percent_change(3, 4), 33.33);
        assert_eq!(percent_change(3, 5), 66.67);
    }

    #[test]
    fn test_unparsed_timestamps_are_unbucketed() {
        let obs = [
            Observation {
                topic_id: 0,
                timestamp: None,
            },
            Observation {
                topic_id: 0,
                timestamp: None,
            },
        ];
        let table = WeeklyTopicCounts::from_observations(&obs);
        assert_eq!(table.unbucketed(), 2);
        assert_eq!(table.topics().count(), 0);
    }
}
