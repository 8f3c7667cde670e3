// Reviewer credibility: how much weight a reviewer's account deserves.
//
// Built from account maturity, review volume and verification, and, when
// the reviewer's earlier reviews are at hand, from how steady their
// sentiment is and how many different places they review.
//
// Credibility never decreases when age, count or verification increase;
// hyperactive posting is reported through the frequency class and the
// risk factors instead of being subtracted here.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{clamp01, ReviewerProfile};

/// Credibility used when a review arrives without a reviewer profile.
pub const NEUTRAL_CREDIBILITY: f64 = 0.5;

/// Account age at which maturity saturates.
const MATURE_ACCOUNT_DAYS: f64 = 365.0;

/// Review count at which volume saturates.
const SATURATED_REVIEW_COUNT: f64 = 50.0;

/// Posting-rate class derived from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFrequency {
    Low,
    Normal,
    High,
    Suspicious,
}

impl ReviewFrequency {
    pub fn from_profile(profile: &ReviewerProfile) -> Self {
        if profile.review_count == 0 {
            return ReviewFrequency::Low;
        }
        let rate = profile.reviews_per_day();
        if rate > 2.0 {
            ReviewFrequency::Suspicious
        } else if rate > 0.5 {
            ReviewFrequency::High
        } else if rate >= 0.02 {
            ReviewFrequency::Normal
        } else {
            ReviewFrequency::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFrequency::Low => "low",
            ReviewFrequency::Normal => "normal",
            ReviewFrequency::High => "high",
            ReviewFrequency::Suspicious => "suspicious",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Email and phone both verified
    Verified,
    /// At least one of photo, email or phone
    Partial,
    Unverified,
}

impl VerificationStatus {
    pub fn from_profile(profile: &ReviewerProfile) -> Self {
        if profile.verified_email && profile.verified_phone {
            VerificationStatus::Verified
        } else if profile.profile_photo || profile.verified_email || profile.verified_phone {
            VerificationStatus::Partial
        } else {
            VerificationStatus::Unverified
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Partial => "partial",
            VerificationStatus::Unverified => "unverified",
        }
    }
}

/// One earlier review by the same reviewer.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub location_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Overall sentiment score, -1 to 1
    pub sentiment: f64,
}

/// Behavioral descriptors reported alongside the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralDescriptors {
    pub review_frequency: ReviewFrequency,
    pub reviews_per_day: f64,
    /// 1 - normalized sentiment spread; None with fewer than two reviews
    pub sentiment_consistency: Option<f64>,
    /// Distinct locations / reviews; None with fewer than two reviews
    pub location_diversity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityProfile {
    pub score: f64,
    pub verification_status: VerificationStatus,
    pub behavior: BehavioralDescriptors,
}

/// Computes credibility profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredibilityProfiler;

impl CredibilityProfiler {
    pub fn profile(&self, reviewer: &ReviewerProfile, history: &[HistoryEntry]) -> CredibilityProfile {
        let maturity = (reviewer.account_age_days as f64 / MATURE_ACCOUNT_DAYS).min(1.0);
        let volume = ((1.0 + reviewer.review_count as f64).ln()
            / (1.0 + SATURATED_REVIEW_COUNT).ln())
        .min(1.0);
        let verification = reviewer.verification_fraction();

        let (consistency, diversity) = if history.len() >= 2 {
            (
                Some(sentiment_consistency(history)),
                Some(location_diversity(history)),
            )
        } else {
            (None, None)
        };

        let score = match (consistency, diversity) {
            (Some(c), Some(d)) => {
                0.25 * maturity + 0.20 * volume + 0.25 * verification + 0.15 * c + 0.15 * d
                    - clustering_penalty(history, d)
            }
            _ => 0.35 * maturity + 0.30 * volume + 0.35 * verification,
        };

        CredibilityProfile {
            score: clamp01(score),
            verification_status: VerificationStatus::from_profile(reviewer),
            behavior: BehavioralDescriptors {
                review_frequency: ReviewFrequency::from_profile(reviewer),
                reviews_per_day: reviewer.reviews_per_day(),
                sentiment_consistency: consistency,
                location_diversity: diversity,
            },
        }
    }

    /// Score only. `None` yields the neutral credibility.
    pub fn score(&self, reviewer: Option<&ReviewerProfile>, history: &[HistoryEntry]) -> f64 {
        reviewer
            .map(|r| self.profile(r, history).score)
            .unwrap_or(NEUTRAL_CREDIBILITY)
    }
}

fn sentiment_consistency(history: &[HistoryEntry]) -> f64 {
    let n = history.len() as f64;
    let mean = history.iter().map(|h| h.sentiment).sum::<f64>() / n;
    let variance = history
        .iter()
        .map(|h| (h.sentiment - mean).powi(2))
        .sum::<f64>()
        / n;
    clamp01(1.0 - variance.sqrt() / 0.5)
}

fn location_diversity(history: &[HistoryEntry]) -> f64 {
    let distinct: HashSet<&str> = history.iter().map(|h| h.location_id.as_str()).collect();
    distinct.len() as f64 / history.len() as f64
}

/// Many reviews of few places inside one week.
fn clustering_penalty(history: &[HistoryEntry], diversity: f64) -> f64 {
    if history.len() < 5 || diversity >= 0.3 {
        return 0.0;
    }
    let stamps: Vec<DateTime<Utc>> = history.iter().filter_map(|h| h.timestamp).collect();
    let (Some(first), Some(last)) = (stamps.iter().min(), stamps.iter().max()) else {
        return 0.0;
    };
    if (*last - *first).num_days() < 7 {
        0.15
    } else {
        0.0
    }
}
