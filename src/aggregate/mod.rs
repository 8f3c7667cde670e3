// Aggregation: location dashboards and reviewer profiles built from
// scored reviews.
//
// Aggregators only read finished TrustScoreResults; they never re-score.
// Everything here is deterministic: ties are broken by recency and then by
// review id, and trend windows end at the latest review rather than at the
// wall clock.

pub mod location;
pub mod reviewer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TrustLabel;
use crate::pipeline::ScoredReview;

/// Scores at or above this are "high trust" in distributions.
pub const HIGH_TRUST_THRESHOLD: f64 = 0.7;
/// Scores below this are "low trust" in distributions.
pub const LOW_TRUST_THRESHOLD: f64 = 0.4;

/// Knobs for dashboards and profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Days covered by the daily trend, ending at the latest review
    pub trend_days: u32,
    /// Size of the top-trusted and flagged lists
    pub top_k: usize,
    /// Entries in a reviewer's recent activity
    pub recent_activity: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            trend_days: 30,
            top_k: 5,
            recent_activity: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustDistribution {
    pub high_trust: usize,
    pub medium_trust: usize,
    pub low_trust: usize,
}

impl TrustDistribution {
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut distribution = Self::default();
        for score in scores {
            if score >= HIGH_TRUST_THRESHOLD {
                distribution.high_trust += 1;
            } else if score >= LOW_TRUST_THRESHOLD {
                distribution.medium_trust += 1;
            } else {
                distribution.low_trust += 1;
            }
        }
        distribution
    }

    pub fn total(&self) -> usize {
        self.high_trust + self.medium_trust + self.low_trust
    }
}

/// Compact view of one scored review for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDigest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    pub text: String,
    pub trust_score: f64,
    pub label: TrustLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub reviewer_id: String,
    /// Short names of the concerns that apply
    #[serde(default)]
    pub flags: Vec<String>,
}

impl ReviewDigest {
    pub fn from_scored(scored: &ScoredReview<'_>) -> Self {
        let result = scored.result;
        let mut flags = Vec::new();
        if result.fake_probability > 0.7 {
            flags.push("high_fake_probability".to_string());
        }
        if result.authenticity_score < 0.3 {
            flags.push("low_authenticity".to_string());
        }
        if result.sentiment_score.manipulation_indicators > 0.5 {
            flags.push("sentiment_manipulation".to_string());
        }
        if result.temporal_consistency < 0.3 {
            flags.push("temporal_anomaly".to_string());
        }
        if result.reviewer_credibility < 0.3 {
            flags.push("low_credibility".to_string());
        }
        Self {
            review_id: scored.review.id.clone(),
            text: scored.review.text.clone(),
            trust_score: result.trust_score,
            label: result.trust_label,
            rating: scored.review.rating,
            timestamp: scored.review.timestamp,
            reviewer_id: scored.review.reviewer_id.clone(),
            flags,
        }
    }
}

/// Order by trust (descending, or ascending when `lowest`), ties broken by
/// most recent first and then by review id.
pub fn ranked<'a>(scored: &[ScoredReview<'a>], lowest: bool) -> Vec<ScoredReview<'a>> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| {
        let by_score = if lowest {
            a.result.trust_score.total_cmp(&b.result.trust_score)
        } else {
            b.result.trust_score.total_cmp(&a.result.trust_score)
        };
        by_score
            .then_with(|| b.review.timestamp.cmp(&a.review.timestamp))
            .then_with(|| a.review.id.cmp(&b.review.id))
    });
    ranked
}

/// The k most (or least) trusted reviews as digests.
pub fn top_k(scored: &[ScoredReview<'_>], k: usize, lowest: bool) -> Vec<ReviewDigest> {
    ranked(scored, lowest)
        .iter()
        .take(k)
        .map(ReviewDigest::from_scored)
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_buckets() {
        let d = TrustDistribution::from_scores([0.9, 0.7, 0.5, 0.4, 0.1]);
        assert_eq!(d.high_trust, 2);
        assert_eq!(d.medium_trust, 2);
        assert_eq!(d.low_trust, 1);
        assert_eq!(d.total(), 5);
    }
}
