// Location dashboard: one place's scored reviews reduced to a summary.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{clamp01, AnomalyRecord, LocationContext};
use crate::pipeline::ScoredReview;

use super::{mean, top_k, AggregateOptions, ReviewDigest, TrustDistribution};

/// Above this many reviews, 5% is trimmed from each end before averaging.
const TRIM_MIN_REVIEWS: usize = 20;
const TRIM_FRACTION: f64 = 0.05;
/// Review count at which the location score stops being pulled toward 0.5.
const FULL_CONFIDENCE_REVIEWS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Mean trust of that day's reviews; None on days without reviews
    pub trust_score: Option<f64>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRisk {
    /// Mean per-review fake probability
    pub fake_review_probability: f64,
    pub reviewer_network_anomalies: usize,
    pub temporal_anomalies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location_id: String,
    #[serde(default)]
    pub location_name: String,
    pub overall_trust_score: f64,
    pub total_reviews: usize,
    pub trust_distribution: TrustDistribution,
    pub trend_data: Vec<TrendPoint>,
    pub risk_factors: LocationRisk,
    pub top_trusted_reviews: Vec<ReviewDigest>,
    pub flagged_reviews: Vec<ReviewDigest>,
    pub anomalies: Vec<AnomalyRecord>,
}

/// Trimmed mean of the scores, shrunk toward 0.5 for small samples.
/// No reviews means no evidence: 0.5.
pub fn location_trust(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.5;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let trimmed = if sorted.len() > TRIM_MIN_REVIEWS {
        let cut = (sorted.len() as f64 * TRIM_FRACTION) as usize;
        &sorted[cut..sorted.len() - cut]
    } else {
        &sorted[..]
    };

    let confidence = (scores.len() as f64 / FULL_CONFIDENCE_REVIEWS).min(1.0);
    clamp01(confidence * mean(trimmed) + (1.0 - confidence) * 0.5)
}

/// One point per day for `days` days, ending on the day of the latest
/// timestamped review.
pub fn daily_trend(scored: &[ScoredReview<'_>], days: u32) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for item in scored {
        let Some(timestamp) = item.review.timestamp else {
            continue;
        };
        let entry = by_day.entry(timestamp.date_naive()).or_default();
        entry.0.push(item.result.trust_score);
        if let Some(rating) = item.review.rating {
            entry.1.push(rating as f64);
        }
    }

    let Some(&end) = by_day.keys().next_back() else {
        return Vec::new();
    };
    let days = days.max(1) as i64;

    (0..days)
        .rev()
        .map(|offset| {
            let date = end - Duration::days(offset);
            match by_day.get(&date) {
                Some((scores, ratings)) => TrendPoint {
                    date,
                    trust_score: Some(mean(scores)),
                    review_count: scores.len(),
                    average_rating: (!ratings.is_empty()).then(|| mean(ratings)),
                },
                None => TrendPoint {
                    date,
                    trust_score: None,
                    review_count: 0,
                    average_rating: None,
                },
            }
        })
        .collect()
}

/// Build the dashboard for one location. `anomalies` should already be
/// limited to those touching the location.
pub fn summarize_location(
    location: &LocationContext,
    scored: &[ScoredReview<'_>],
    anomalies: &[AnomalyRecord],
    options: &AggregateOptions,
) -> LocationSummary {
    let scores: Vec<f64> = scored.iter().map(|s| s.result.trust_score).collect();
    let fake: Vec<f64> = scored.iter().map(|s| s.result.fake_probability).collect();

    LocationSummary {
        location_id: location.id.clone(),
        location_name: location.name.clone(),
        overall_trust_score: location_trust(&scores),
        total_reviews: scored.len(),
        trust_distribution: TrustDistribution::from_scores(scores.iter().copied()),
        trend_data: daily_trend(scored, options.trend_days),
        risk_factors: LocationRisk {
            fake_review_probability: mean(&fake),
            reviewer_network_anomalies: anomalies
                .iter()
                .filter(|a| !a.anomaly_type.is_temporal())
                .count(),
            temporal_anomalies: anomalies
                .iter()
                .filter(|a| a.anomaly_type.is_temporal())
                .count(),
        },
        top_trusted_reviews: top_k(scored, options.top_k, false),
        flagged_reviews: top_k(scored, options.top_k, true),
        anomalies: anomalies.to_vec(),
    }
}
