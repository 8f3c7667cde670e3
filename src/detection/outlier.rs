// Statistical outliers across the reviewer population of a batch.
//
// - Velocity: a reviewer's reviews-per-day (from their profile) has a robust
//   z-score above `outlier_z_threshold`.
// - Sentiment uniformity: a reviewer with several reviews in the batch who
//   is always strongly and identically opinionated.
//
// Both need a population of at least `min_population` reviewers to be
// meaningful; smaller batches report nothing.
//
// The z-score is centred on the population median and scaled by the median
// absolute deviation, so one extreme reviewer cannot inflate the spread it is
// measured against. When more than half the population is identical the MAD
// is zero and the mean absolute deviation takes its place.

use std::collections::BTreeMap;

use crate::models::{clamp01, AnomalyRecord, AnomalyType, ReviewerDirectory};

use super::{DetectorConfig, Finding, Timed};

/// Consistency constants relating MAD and mean absolute deviation to a
/// normal standard deviation.
const MAD_SCALE: f64 = 1.4826;
const MEAN_AD_SCALE: f64 = 1.2533;

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median and spread for robust z-scores. `None` when every value is equal.
fn robust_center(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let center = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    let mad = median(&deviations);
    let spread = if mad > f64::EPSILON {
        MAD_SCALE * mad
    } else {
        let mut sorted = deviations;
        sorted.sort_by(f64::total_cmp);
        MEAN_AD_SCALE * sorted.iter().sum::<f64>() / sorted.len() as f64
    };
    (spread > f64::EPSILON).then_some((center, spread))
}

/// Reviewer id -> timeline positions, in timeline order.
fn group_by_reviewer<'t>(timeline: &'t [Timed<'_>]) -> BTreeMap<&'t str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, item) in timeline.iter().enumerate() {
        let id = item.review.reviewer_id.as_str();
        if !id.is_empty() {
            groups.entry(id).or_default().push(pos);
        }
    }
    groups
}

fn finding(
    timeline: &[Timed<'_>],
    reviewer: &str,
    positions: &[usize],
    anomaly_type: AnomalyType,
    severity: f64,
) -> Option<Finding> {
    let last = *positions.last()?;
    let mut locations: Vec<String> = positions
        .iter()
        .map(|&p| timeline[p].review.location_id.clone())
        .collect();
    locations.sort();
    locations.dedup();
    Some(Finding {
        record: AnomalyRecord {
            timestamp: timeline[last].timestamp,
            anomaly_type,
            severity: clamp01(severity),
            review_count: positions.len(),
            trust_score: None,
            reviewer_ids: vec![reviewer.to_string()],
            location_ids: locations,
        },
        members: positions.iter().map(|&p| timeline[p].index).collect(),
    })
}

pub fn detect_velocity_outliers(
    timeline: &[Timed<'_>],
    reviewers: &ReviewerDirectory,
    config: &DetectorConfig,
) -> Vec<Finding> {
    let groups = group_by_reviewer(timeline);
    let population: Vec<(&str, f64)> = groups
        .keys()
        .filter_map(|id| reviewers.get(*id).map(|p| (*id, p.reviews_per_day())))
        .collect();
    if population.len() < config.min_population {
        return Vec::new();
    }

    let rates: Vec<f64> = population.iter().map(|(_, r)| *r).collect();
    let Some((center, spread)) = robust_center(&rates) else {
        return Vec::new();
    };

    population
        .iter()
        .filter_map(|&(id, rate)| {
            let z = (rate - center) / spread;
            if z <= config.outlier_z_threshold {
                return None;
            }
            finding(
                timeline,
                id,
                groups.get(id)?,
                AnomalyType::TemporalIrregularity,
                (z / 3.0).min(1.0),
            )
        })
        .collect()
}

pub fn detect_sentiment_uniformity(timeline: &[Timed<'_>], config: &DetectorConfig) -> Vec<Finding> {
    let groups = group_by_reviewer(timeline);
    let population: Vec<(&str, f64)> = groups
        .iter()
        .filter(|(_, positions)| positions.len() >= config.min_reviews_for_uniformity)
        .map(|(id, positions)| {
            let sentiments: Vec<f64> = positions.iter().map(|&p| timeline[p].sentiment).collect();
            let mean_abs = sentiments.iter().map(|s| s.abs()).sum::<f64>() / sentiments.len() as f64;
            let (_, std) = mean_std(&sentiments);
            (*id, mean_abs * (1.0 - (std / 0.5).min(1.0)))
        })
        .collect();
    if population.len() < config.min_population {
        return Vec::new();
    }

    let scores: Vec<f64> = population.iter().map(|(_, u)| *u).collect();
    let Some((center, spread)) = robust_center(&scores) else {
        return Vec::new();
    };

    population
        .iter()
        .filter_map(|&(id, uniformity)| {
            let z = (uniformity - center) / spread;
            if z <= config.outlier_z_threshold || uniformity < 0.5 {
                return None;
            }
            finding(
                timeline,
                id,
                groups.get(id)?,
                AnomalyType::SentimentManipulation,
                (z / 3.0).min(1.0) * uniformity,
            )
        })
        .collect()
}
