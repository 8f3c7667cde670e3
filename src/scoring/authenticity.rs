// Authenticity scoring: how much a review reads like a genuine, specific
// account of a visit.
//
// Four factors, each in [0, 1] where higher is more genuine:
// - linguistic_quality: concrete detail rewarded; shouting, superlative
//   stuffing and garbled tokens penalized
// - sentiment_consistency: no manipulation markers, and the text agrees with
//   the star rating
// - length_appropriate: neither a two-word drive-by nor a wall of text
// - spam_indicators: free of templates, keyword stuffing and promo language
//
// The overall score is a weighted mean of the four.

use crate::models::{
    clamp01, AuthenticityFactors, AuthenticityResult, SentimentCategory, SentimentResult,
};
use crate::text::features::TextFeatures;

/// Weights for combining the authenticity factors. Normalized by their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthenticityWeights {
    pub linguistic_quality: f64,
    pub sentiment_consistency: f64,
    pub length_appropriate: f64,
    pub spam_indicators: f64,
}

impl Default for AuthenticityWeights {
    fn default() -> Self {
        Self {
            linguistic_quality: 0.25,
            sentiment_consistency: 0.25,
            length_appropriate: 0.25,
            spam_indicators: 0.25,
        }
    }
}

/// Scores a review's text for authenticity.
#[derive(Debug, Clone, Default)]
pub struct AuthenticityScorer {
    pub weights: AuthenticityWeights,
}

impl AuthenticityScorer {
    pub fn new(weights: AuthenticityWeights) -> Self {
        Self { weights }
    }

    /// Score pre-extracted features. Empty text scores 0.0 on every factor.
    pub fn score(
        &self,
        features: &TextFeatures,
        sentiment: &SentimentResult,
        rating: Option<u8>,
    ) -> AuthenticityResult {
        if features.is_empty() {
            return AuthenticityResult::default();
        }

        let factors = AuthenticityFactors {
            linguistic_quality: linguistic_quality(features),
            sentiment_consistency: sentiment_consistency(sentiment, rating),
            length_appropriate: length_appropriate(features),
            spam_indicators: spam_indicators(features),
        };

        let w = &self.weights;
        let total =
            w.linguistic_quality + w.sentiment_consistency + w.length_appropriate + w.spam_indicators;
        let score = if total <= 0.0 {
            0.0
        } else {
            (factors.linguistic_quality * w.linguistic_quality
                + factors.sentiment_consistency * w.sentiment_consistency
                + factors.length_appropriate * w.length_appropriate
                + factors.spam_indicators * w.spam_indicators)
                / total
        };

        AuthenticityResult {
            score: clamp01(score),
            factors,
        }
    }

    /// Convenience wrapper for callers holding raw text.
    pub fn score_text(
        &self,
        text: &str,
        sentiment: &SentimentResult,
        rating: Option<u8>,
    ) -> AuthenticityResult {
        self.score(&TextFeatures::extract(text), sentiment, rating)
    }
}

/// Base 0.7, up to +0.3 for concrete detail, minus penalties.
pub fn linguistic_quality(features: &TextFeatures) -> f64 {
    let shout = clamp01((features.caps_ratio - 0.3) / 0.7);
    let superlatives = features.superlative_density().min(1.0);
    let mut quality = 0.7 + 0.3 * features.specificity()
        - 0.5 * shout
        - 0.5 * superlatives
        - 0.5 * features.irregular_ratio();

    // Run-on walls and telegraphic fragments both read poorly
    if features.word_count >= 10
        && (features.avg_sentence_length < 3.0 || features.avg_sentence_length > 40.0)
    {
        quality -= 0.1;
    }
    clamp01(quality)
}

/// 1 - manipulation, further reduced when the text contradicts the rating.
pub fn sentiment_consistency(sentiment: &SentimentResult, rating: Option<u8>) -> f64 {
    let base = 1.0 - sentiment.manipulation_indicators;
    let mismatch = match rating {
        Some(r) if r <= 2 && sentiment.category == SentimentCategory::Positive => {
            0.3 + 0.4 * sentiment.polarity.abs()
        }
        Some(r) if r >= 4 && sentiment.category == SentimentCategory::Negative => {
            0.3 + 0.4 * sentiment.polarity.abs()
        }
        Some(3) if sentiment.polarity.abs() > 0.6 => 0.2,
        _ => 0.0,
    };
    clamp01(base * (1.0 - mismatch))
}

/// Piecewise length credit, shrunk for texts that repeat themselves.
pub fn length_appropriate(features: &TextFeatures) -> f64 {
    let n = features.word_count as f64;
    let credit = match features.word_count {
        0 => 0.0,
        1..=2 => 0.1,
        3..=9 => 0.3 + 0.7 * (n - 3.0) / 7.0,
        10..=150 => 1.0,
        151..=500 => 1.0 - 0.4 * (n - 150.0) / 350.0,
        _ => 0.5,
    };
    let diversity = if features.unique_ratio < 0.5 {
        (features.unique_ratio / 0.5).powi(2)
    } else {
        1.0
    };
    clamp01(credit * diversity)
}

/// 1.0 for clean text; templates, one dominating word and promo language
/// each pull it down.
pub fn spam_indicators(features: &TextFeatures) -> f64 {
    let promo = (0.1 * features.promo_count as f64).min(0.3);
    clamp01(
        (1.0 - features.template_similarity)
            * (1.0 - features.dominant_token_ratio)
            * (1.0 - promo),
    )
}
