// Data models: the records that flow between analyzers.
//
// Inputs (Review, ReviewerProfile, LocationContext) are supplied by the
// caller per request. Results are created fresh per call and never cached.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};

/// Clamp a score into [0, 1]. NaN collapses to 0.0 so a degenerate
/// division never leaks out of an analyzer.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp a signed score into [-1, 1].
pub fn clamp_signed(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// A single user-submitted review of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Caller-assigned identifier, used to label digests and activity entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    /// Required for temporal detection; optional when scoring one review
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Star rating, 1-5
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub reviewer_id: String,
    #[serde(default)]
    pub location_id: String,
}

impl Review {
    /// Build a review with only text, as in a one-off analysis request.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            timestamp: None,
            rating: None,
            reviewer_id: String::new(),
            location_id: String::new(),
        }
    }

    /// Check the fields that have a bounded range.
    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(TrustError::validation(format!(
                    "rating must be between 1 and 5, got {rating}"
                )));
            }
        }
        Ok(())
    }

    /// Whether the text carries any content at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Snapshot of a reviewer's account metadata. The engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerProfile {
    #[serde(default)]
    pub account_age_days: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub profile_photo: bool,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub verified_phone: bool,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ReviewerProfile {
    /// Fraction of {photo, email, phone} that are verified.
    pub fn verification_fraction(&self) -> f64 {
        let verified = [self.profile_photo, self.verified_email, self.verified_phone]
            .iter()
            .filter(|v| **v)
            .count();
        verified as f64 / 3.0
    }

    pub fn has_bio(&self) -> bool {
        self.bio.as_deref().is_some_and(|b| !b.trim().is_empty())
    }

    /// Average reviews per day of account age. Accounts younger than a day
    /// count as one day old.
    pub fn reviews_per_day(&self) -> f64 {
        self.review_count as f64 / self.account_age_days.max(1) as f64
    }
}

/// Reviewer profiles keyed by reviewer id.
pub type ReviewerDirectory = HashMap<String, ReviewerProfile>;

/// A reviewed place. Used for grouping and labels only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    /// Polarity above 0.1 is positive, below -0.1 negative.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.1 {
            SentimentCategory::Positive
        } else if polarity < -0.1 {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
        }
    }
}

/// Output of the sentiment analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// -1.0 (negative) to 1.0 (positive)
    pub polarity: f64,
    /// 0.0 (objective) to 1.0 (subjective)
    pub subjectivity: f64,
    /// Blend of polarity and lexical intensity, -1.0 to 1.0
    pub overall_score: f64,
    pub confidence: f64,
    pub category: SentimentCategory,
    pub intensity: f64,
    pub manipulation_indicators: f64,
    /// Keyword-list opinion, -1.0 to 1.0; compared with polarity for confidence
    pub keyword_sentiment: f64,
}

impl SentimentResult {
    /// The result for text with nothing to analyze.
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            overall_score: 0.0,
            confidence: 0.0,
            category: SentimentCategory::Neutral,
            intensity: 0.0,
            manipulation_indicators: 0.0,
            keyword_sentiment: 0.0,
        }
    }
}

/// Condensed sentiment view included in a trust result's analysis block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub category: SentimentCategory,
    pub intensity: f64,
    pub manipulation_indicators: f64,
    /// 1 - manipulation_indicators
    pub authenticity_score: f64,
}

impl From<&SentimentResult> for SentimentBreakdown {
    fn from(sentiment: &SentimentResult) -> Self {
        Self {
            category: sentiment.category,
            intensity: sentiment.intensity,
            manipulation_indicators: sentiment.manipulation_indicators,
            authenticity_score: clamp01(1.0 - sentiment.manipulation_indicators),
        }
    }
}

/// Itemized authenticity factors, each in [0, 1] where higher is more genuine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityFactors {
    pub linguistic_quality: f64,
    pub sentiment_consistency: f64,
    pub length_appropriate: f64,
    pub spam_indicators: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityResult {
    pub score: f64,
    pub factors: AuthenticityFactors,
}

/// Named risk indicators, each in [0, 1] where higher is riskier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub text_patterns: f64,
    pub reviewer_behavior: f64,
    pub account_age_risk: f64,
    pub review_frequency_risk: f64,
    pub profile_completeness: f64,
}

impl RiskFactors {
    /// Every indicator at maximum. Used for reviews with no text.
    pub fn all_flagged() -> Self {
        Self {
            text_patterns: 1.0,
            reviewer_behavior: 1.0,
            account_age_risk: 1.0,
            review_frequency_risk: 1.0,
            profile_completeness: 1.0,
        }
    }

    pub fn values(&self) -> [f64; 5] {
        [
            self.text_patterns,
            self.reviewer_behavior,
            self.account_age_risk,
            self.review_frequency_risk,
            self.profile_completeness,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    ReviewBombing,
    CoordinatedNetwork,
    TemporalIrregularity,
    SentimentManipulation,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::ReviewBombing => "review_bombing",
            AnomalyType::CoordinatedNetwork => "coordinated_network",
            AnomalyType::TemporalIrregularity => "temporal_irregularity",
            AnomalyType::SentimentManipulation => "sentiment_manipulation",
        }
    }

    /// Anomalies that describe timing rather than relationships.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            AnomalyType::ReviewBombing | AnomalyType::TemporalIrregularity
        )
    }
}

impl std::fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One detected anomaly across a review set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub timestamp: DateTime<Utc>,
    pub anomaly_type: AnomalyType,
    pub severity: f64,
    /// Number of reviews involved
    pub review_count: usize,
    /// Mean trust of the affected reviews, filled in once they are scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<f64>,
    #[serde(default)]
    pub reviewer_ids: Vec<String>,
    #[serde(default)]
    pub location_ids: Vec<String>,
}

/// Categorical trust label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLabel {
    Untrusted,
    LowTrust,
    Moderate,
    Trusted,
    HighlyTrusted,
}

impl TrustLabel {
    /// Determine the label from a trust score (0-1).
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => TrustLabel::HighlyTrusted,
            s if s >= 0.6 => TrustLabel::Trusted,
            s if s >= 0.4 => TrustLabel::Moderate,
            s if s >= 0.2 => TrustLabel::LowTrust,
            _ => TrustLabel::Untrusted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLabel::HighlyTrusted => "highly_trusted",
            TrustLabel::Trusted => "trusted",
            TrustLabel::Moderate => "moderate",
            TrustLabel::LowTrust => "low_trust",
            TrustLabel::Untrusted => "untrusted",
        }
    }

    /// One-sentence reading of the label, used to open explanations.
    pub fn summary(&self) -> &'static str {
        match self {
            TrustLabel::HighlyTrusted => {
                "This review shows strong indicators of authenticity and reliability."
            }
            TrustLabel::Trusted => "This review appears genuine with good credibility indicators.",
            TrustLabel::Moderate => {
                "This review has mixed trust signals and should be considered with caution."
            }
            TrustLabel::LowTrust => {
                "This review shows several suspicious patterns and may not be reliable."
            }
            TrustLabel::Untrusted => {
                "This review exhibits many characteristics of fake or manipulated content."
            }
        }
    }
}

impl std::fmt::Display for TrustLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five ensemble inputs of the trust calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustFactor {
    Authenticity,
    SentimentQuality,
    ReviewerCredibility,
    ContentQuality,
    TemporalConsistency,
}

impl TrustFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustFactor::Authenticity => "authenticity",
            TrustFactor::SentimentQuality => "sentiment quality",
            TrustFactor::ReviewerCredibility => "reviewer credibility",
            TrustFactor::ContentQuality => "content quality",
            TrustFactor::TemporalConsistency => "temporal consistency",
        }
    }
}

/// A factor's weighted share of the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: TrustFactor,
    pub subscore: f64,
    pub weight: f64,
    /// weight * subscore, what the factor added
    pub contribution: f64,
    /// weight * (1 - subscore), what the factor held back
    pub shortfall: f64,
}

/// Nested analysis block of a trust result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAnalysis {
    pub sentiment: SentimentBreakdown,
    pub authenticity_factors: AuthenticityFactors,
    pub risk_factors: RiskFactors,
}

/// Complete per-review trust assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScoreResult {
    pub trust_score: f64,
    pub trust_label: TrustLabel,
    pub authenticity_score: f64,
    pub fake_probability: f64,
    pub reviewer_credibility: f64,
    pub temporal_consistency: f64,
    pub sentiment_score: SentimentResult,
    pub analysis: TrustAnalysis,
    pub explanation: String,
    /// Sorted by contribution, largest first
    pub contributions: Vec<Contribution>,
}
