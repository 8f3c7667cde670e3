// Trust engine: orchestrates scoring for a single review.
//
// Given a review and (optionally) its reviewer, the engine:
// 1. Validates the review
// 2. Extracts text features once
// 3. Runs sentiment, authenticity and risk analysis on those features
// 4. Derives credibility, fake probability and temporal consistency
// 5. Combines everything into a TrustScoreResult
//
// The engine holds no mutable state. All of its parts are read-only after
// construction, so one engine can score reviews from many threads at once.

use tracing::debug;

use crate::detection::{fake_probability, DetectorConfig, FakeProbabilityWeights, FakeReviewDetector};
use crate::error::Result;
use crate::models::{Review, ReviewerProfile, SentimentResult, TrustScoreResult};
use crate::scoring::authenticity::{AuthenticityScorer, AuthenticityWeights};
use crate::scoring::credibility::{CredibilityProfiler, NEUTRAL_CREDIBILITY};
use crate::scoring::risk;
use crate::scoring::trust::{self, TrustCalculator, TrustInputs, TrustWeights};
use crate::sentiment::lexical::LexicalSentimentAnalyzer;
use crate::sentiment::traits::SentimentAnalyzer;
use crate::text::features::TextFeatures;

/// Every tunable of the engine in one place.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub trust_weights: TrustWeights,
    pub authenticity_weights: AuthenticityWeights,
    pub fake_weights: FakeProbabilityWeights,
    pub detector: DetectorConfig,
}

/// Text analysis for one review, computed once and shared by every scorer.
pub(crate) struct Prepared {
    pub features: TextFeatures,
    pub sentiment: SentimentResult,
}

pub struct TrustEngine {
    pub(crate) sentiment: Box<dyn SentimentAnalyzer>,
    pub(crate) authenticity: AuthenticityScorer,
    pub(crate) credibility: CredibilityProfiler,
    pub(crate) detector: FakeReviewDetector,
    pub(crate) calculator: TrustCalculator,
    pub(crate) fake_weights: FakeProbabilityWeights,
}

impl Default for TrustEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TrustEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_analyzer(config, Box::new(LexicalSentimentAnalyzer::default()))
    }

    /// Build an engine around a different sentiment analyzer.
    pub fn with_analyzer(config: EngineConfig, sentiment: Box<dyn SentimentAnalyzer>) -> Self {
        Self {
            sentiment,
            authenticity: AuthenticityScorer::new(config.authenticity_weights),
            credibility: CredibilityProfiler,
            detector: FakeReviewDetector::new(config.detector),
            calculator: TrustCalculator::new(config.trust_weights),
            fake_weights: config.fake_weights,
        }
    }

    pub fn detector(&self) -> &FakeReviewDetector {
        &self.detector
    }

    pub fn credibility(&self) -> &CredibilityProfiler {
        &self.credibility
    }

    pub fn analyze_sentiment(&self, text: &str) -> SentimentResult {
        self.sentiment.analyze(text)
    }

    /// Score one review on its own. No batch context: temporal consistency
    /// comes only from the reviewer's posting rate, and credibility from the
    /// profile alone.
    pub fn analyze_review(
        &self,
        review: &Review,
        reviewer: Option<&ReviewerProfile>,
    ) -> Result<TrustScoreResult> {
        review.validate()?;
        let prepared = self.prepare(review);
        let credibility = reviewer.map(|r| self.credibility.profile(r, &[]).score);
        Ok(self.score_prepared(review, &prepared, reviewer, credibility, None))
    }

    pub(crate) fn prepare(&self, review: &Review) -> Prepared {
        let features = TextFeatures::extract(&review.text);
        let sentiment = if review.is_blank() {
            SentimentResult::neutral()
        } else {
            self.sentiment.analyze_features(&review.text, &features)
        };
        Prepared {
            features,
            sentiment,
        }
    }

    /// Final scoring step shared by single-review and batch analysis.
    pub(crate) fn score_prepared(
        &self,
        review: &Review,
        prepared: &Prepared,
        reviewer: Option<&ReviewerProfile>,
        credibility: Option<f64>,
        anomaly_severity: Option<f64>,
    ) -> TrustScoreResult {
        if review.is_blank() {
            return self.calculator.empty_text(prepared.sentiment.clone());
        }

        let authenticity =
            self.authenticity
                .score(&prepared.features, &prepared.sentiment, review.rating);
        let risk_factors = risk::assess(&prepared.features, reviewer);
        let reviewer_credibility = credibility.unwrap_or(NEUTRAL_CREDIBILITY);
        let fake = fake_probability(
            authenticity.score,
            reviewer_credibility,
            anomaly_severity,
            &self.fake_weights,
        );
        let temporal = trust::temporal_consistency(reviewer, anomaly_severity);

        let result = self.calculator.score(&TrustInputs {
            review,
            sentiment: &prepared.sentiment,
            authenticity: &authenticity,
            risk_factors,
            reviewer_credibility,
            fake_probability: fake,
            temporal_consistency: temporal,
        });

        debug!(
            review = review.id.as_deref().unwrap_or("-"),
            trust = result.trust_score,
            label = %result.trust_label,
            fake_probability = fake,
            "Review scored"
        );
        result
    }
}
