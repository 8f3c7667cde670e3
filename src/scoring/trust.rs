// Combined trust score formula.
//
// The trust score is a weighted ensemble of five sub-scores, each in [0, 1]:
// - authenticity: text authenticity blended with (1 - fake probability)
// - sentiment quality: free of manipulation, read with confidence
// - reviewer credibility
// - content quality: sensible length, no spam markers
// - temporal consistency: posting cadence and anomaly participation
//
// A review the detector is almost sure is fake (fake probability > 0.8) has
// its score halved after the ensemble.

use crate::models::{
    clamp01, AuthenticityResult, Contribution, Review, ReviewerProfile, RiskFactors,
    SentimentBreakdown, SentimentResult, TrustAnalysis, TrustFactor, TrustLabel,
    TrustScoreResult,
};

/// Configurable ensemble weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustWeights {
    pub authenticity: f64,
    pub sentiment_quality: f64,
    pub reviewer_credibility: f64,
    pub content_quality: f64,
    pub temporal_consistency: f64,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self {
            authenticity: 0.25,
            sentiment_quality: 0.20,
            reviewer_credibility: 0.25,
            content_quality: 0.15,
            temporal_consistency: 0.15,
        }
    }
}

/// Tolerance on the weight sum.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

impl TrustWeights {
    pub fn sum(&self) -> f64 {
        self.authenticity
            + self.sentiment_quality
            + self.reviewer_credibility
            + self.content_quality
            + self.temporal_consistency
    }

    /// Reject negative weights and sums away from 1.0.
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.authenticity,
            self.sentiment_quality,
            self.reviewer_credibility,
            self.content_quality,
            self.temporal_consistency,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("trust weights must be non-negative numbers".to_string());
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("trust weights must sum to 1.0, got {sum:.3}"));
        }
        Ok(())
    }

    fn weight(&self, factor: TrustFactor) -> f64 {
        match factor {
            TrustFactor::Authenticity => self.authenticity,
            TrustFactor::SentimentQuality => self.sentiment_quality,
            TrustFactor::ReviewerCredibility => self.reviewer_credibility,
            TrustFactor::ContentQuality => self.content_quality,
            TrustFactor::TemporalConsistency => self.temporal_consistency,
        }
    }
}

/// Fake probability above which the final score is halved.
const FAKE_PENALTY_THRESHOLD: f64 = 0.8;

/// Everything the calculator needs for one review.
pub struct TrustInputs<'a> {
    pub review: &'a Review,
    pub sentiment: &'a SentimentResult,
    pub authenticity: &'a AuthenticityResult,
    pub risk_factors: RiskFactors,
    pub reviewer_credibility: f64,
    pub fake_probability: f64,
    pub temporal_consistency: f64,
}

/// Temporal consistency from the reviewer's cadence and the worst anomaly
/// the review sits in.
pub fn temporal_consistency(reviewer: Option<&ReviewerProfile>, anomaly_severity: Option<f64>) -> f64 {
    let mut base: f64 = 1.0;
    if let Some(profile) = reviewer {
        let rate = profile.reviews_per_day();
        if rate > 3.0 {
            base -= 0.4;
        } else if rate > 1.0 {
            base -= 0.2;
        }
    }
    if let Some(severity) = anomaly_severity {
        base = base.min(0.25 * (1.0 - clamp01(severity)));
    }
    clamp01(base)
}

#[derive(Debug, Clone, Default)]
pub struct TrustCalculator {
    pub weights: TrustWeights,
}

impl TrustCalculator {
    pub fn new(weights: TrustWeights) -> Self {
        Self { weights }
    }

    /// Compute the trust result for one review.
    pub fn score(&self, inputs: &TrustInputs<'_>) -> TrustScoreResult {
        if inputs.review.is_blank() {
            return self.empty_text(inputs.sentiment.clone());
        }

        let authenticity = inputs.authenticity;
        let factors = &authenticity.factors;
        let sentiment = inputs.sentiment;

        let subscores = [
            (
                TrustFactor::Authenticity,
                (authenticity.score + (1.0 - inputs.fake_probability)) / 2.0,
            ),
            (
                TrustFactor::SentimentQuality,
                0.6 * (1.0 - sentiment.manipulation_indicators) + 0.4 * sentiment.confidence,
            ),
            (TrustFactor::ReviewerCredibility, inputs.reviewer_credibility),
            (
                TrustFactor::ContentQuality,
                (factors.length_appropriate + factors.spam_indicators) / 2.0,
            ),
            (TrustFactor::TemporalConsistency, inputs.temporal_consistency),
        ];

        let mut contributions: Vec<Contribution> = subscores
            .iter()
            .map(|&(factor, subscore)| {
                let subscore = clamp01(subscore);
                let weight = self.weights.weight(factor);
                Contribution {
                    factor,
                    subscore,
                    weight,
                    contribution: weight * subscore,
                    shortfall: weight * (1.0 - subscore),
                }
            })
            .collect();

        let mut trust_score = clamp01(contributions.iter().map(|c| c.contribution).sum());
        if inputs.fake_probability > FAKE_PENALTY_THRESHOLD {
            trust_score *= 0.5;
        }
        let trust_label = TrustLabel::from_score(trust_score);

        // Stable sort keeps the factor order for ties
        contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

        let explanation = explain(trust_label, &contributions, inputs);

        TrustScoreResult {
            trust_score,
            trust_label,
            authenticity_score: authenticity.score,
            fake_probability: inputs.fake_probability,
            reviewer_credibility: inputs.reviewer_credibility,
            temporal_consistency: inputs.temporal_consistency,
            sentiment_score: sentiment.clone(),
            analysis: TrustAnalysis {
                sentiment: SentimentBreakdown::from(sentiment),
                authenticity_factors: *factors,
                risk_factors: inputs.risk_factors,
            },
            explanation,
            contributions,
        }
    }

    /// Result for a review with no text: nothing to trust.
    pub fn empty_text(&self, sentiment: SentimentResult) -> TrustScoreResult {
        let contributions = [
            TrustFactor::Authenticity,
            TrustFactor::SentimentQuality,
            TrustFactor::ReviewerCredibility,
            TrustFactor::ContentQuality,
            TrustFactor::TemporalConsistency,
        ]
        .into_iter()
        .map(|factor| {
            let weight = self.weights.weight(factor);
            Contribution {
                factor,
                subscore: 0.0,
                weight,
                contribution: 0.0,
                shortfall: weight,
            }
        })
        .collect();

        TrustScoreResult {
            trust_score: 0.0,
            trust_label: TrustLabel::Untrusted,
            authenticity_score: 0.0,
            fake_probability: 1.0,
            reviewer_credibility: 0.0,
            temporal_consistency: 0.0,
            analysis: TrustAnalysis {
                sentiment: SentimentBreakdown::from(&sentiment),
                authenticity_factors: Default::default(),
                risk_factors: RiskFactors::all_flagged(),
            },
            sentiment_score: sentiment,
            explanation: "Review text is empty; there is nothing to assess.".to_string(),
            contributions,
        }
    }
}

/// Label summary, strongest signals, main concerns, then the full breakdown.
fn explain(label: TrustLabel, contributions: &[Contribution], inputs: &TrustInputs<'_>) -> String {
    let mut parts = vec![label.summary().to_string()];

    let strengths: Vec<String> = contributions
        .iter()
        .filter(|c| c.contribution > 0.0)
        .take(2)
        .map(|c| format!("{} (+{:.2})", c.factor.as_str(), c.contribution))
        .collect();
    if !strengths.is_empty() {
        parts.push(format!("Strongest signals: {}.", strengths.join(", ")));
    }

    let mut by_shortfall: Vec<&Contribution> = contributions.iter().collect();
    by_shortfall.sort_by(|a, b| b.shortfall.total_cmp(&a.shortfall));
    let mut concerns: Vec<String> = by_shortfall
        .iter()
        .filter(|c| c.shortfall > 0.0)
        .take(2)
        .map(|c| format!("{} (-{:.2})", c.factor.as_str(), c.shortfall))
        .collect();

    if inputs.authenticity.score < 0.3 {
        concerns.push("low authenticity score".to_string());
    }
    if inputs.fake_probability > 0.7 {
        concerns.push("high fake probability".to_string());
    }
    if inputs.reviewer_credibility < 0.3 {
        concerns.push("low reviewer credibility".to_string());
    }
    if inputs.temporal_consistency < 0.3 {
        concerns.push("posted inside a detected anomaly or at an unusual rate".to_string());
    }
    if !concerns.is_empty() {
        parts.push(format!("Main concerns: {}.", concerns.join(", ")));
    }

    let breakdown: Vec<String> = contributions
        .iter()
        .map(|c| {
            format!(
                "{} {:.2} x {:.2} = {:.3}",
                c.factor.as_str(),
                c.subscore,
                c.weight,
                c.contribution
            )
        })
        .collect();
    parts.push(format!("Breakdown: {}.", breakdown.join("; ")));

    parts.join(" ")
}
