// Reviewer profile: a reviewer's account and scored reviews reduced to a
// trust summary.

use serde::{Deserialize, Serialize};

use crate::models::{clamp01, AnomalyRecord, AnomalyType, ReviewerProfile, TrustLabel};
use crate::pipeline::ScoredReview;
use crate::scoring::credibility::{CredibilityProfile, ReviewFrequency, VerificationStatus};

use super::{mean, AggregateOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    /// Not part of any coordinated network
    Clean,
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralAnalysis {
    pub review_frequency: ReviewFrequency,
    pub sentiment_consistency: Option<f64>,
    pub location_diversity: Option<f64>,
    pub network_analysis: NetworkStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub trust_score: f64,
    /// Signed distance from neutral (0.5): how much this review helps or
    /// hurts the reviewer's standing
    pub trust_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerSummary {
    pub reviewer_id: String,
    pub trust_score: f64,
    pub trust_label: TrustLabel,
    /// Reviews reported by the profile
    pub review_count: u32,
    /// Reviews actually scored
    pub reviews_analyzed: usize,
    pub account_age_days: u32,
    pub verification_status: VerificationStatus,
    pub behavioral_analysis: BehavioralAnalysis,
    pub recent_activity: Vec<ActivityEntry>,
    pub anomalies: Vec<AnomalyRecord>,
}

/// Build the summary. `anomalies` should already be limited to those the
/// reviewer is part of.
pub fn summarize_reviewer(
    reviewer_id: &str,
    profile: &ReviewerProfile,
    credibility: &CredibilityProfile,
    scored: &[ScoredReview<'_>],
    anomalies: &[AnomalyRecord],
    options: &AggregateOptions,
) -> ReviewerSummary {
    let scores: Vec<f64> = scored.iter().map(|s| s.result.trust_score).collect();
    // Half account credibility, half the trust its reviews earned
    let trust_score = if scores.is_empty() {
        credibility.score
    } else {
        clamp01(0.5 * credibility.score + 0.5 * mean(&scores))
    };

    let network_analysis = if anomalies
        .iter()
        .any(|a| a.anomaly_type == AnomalyType::CoordinatedNetwork)
    {
        NetworkStatus::Flagged
    } else {
        NetworkStatus::Clean
    };

    let mut recent = scored.to_vec();
    recent.sort_by(|a, b| {
        b.review
            .timestamp
            .cmp(&a.review.timestamp)
            .then_with(|| a.review.id.cmp(&b.review.id))
    });
    let recent_activity = recent
        .iter()
        .take(options.recent_activity)
        .map(|s| ActivityEntry {
            review_id: s.review.id.clone(),
            location_id: s.review.location_id.clone(),
            timestamp: s.review.timestamp,
            trust_score: s.result.trust_score,
            trust_impact: s.result.trust_score - 0.5,
        })
        .collect();

    ReviewerSummary {
        reviewer_id: reviewer_id.to_string(),
        trust_score,
        trust_label: TrustLabel::from_score(trust_score),
        review_count: profile.review_count,
        reviews_analyzed: scored.len(),
        account_age_days: profile.account_age_days,
        verification_status: credibility.verification_status,
        behavioral_analysis: BehavioralAnalysis {
            review_frequency: credibility.behavior.review_frequency,
            sentiment_consistency: credibility.behavior.sentiment_consistency,
            location_diversity: credibility.behavior.location_diversity,
            network_analysis,
        },
        recent_activity,
        anomalies: anomalies.to_vec(),
    }
}

