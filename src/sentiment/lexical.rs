// Lexicon-based sentiment analysis.
//
// Polarity and subjectivity are the mean of the lexicon entries found in
// the text, with two local adjustments:
// - an intensifier directly before a word scales its polarity ("really good")
// - a negation within the three preceding tokens flips and halves it
//   ("not good" reads as mildly negative, not as strongly negative)
//
// Manipulation indicators are additive penalties for the surface habits of
// hyped or fabricated reviews: shouting, repeated superlatives, punctuation
// runs, back-to-back repeated words, template phrases, and extreme polarity
// delivered with little subjective detail.

use crate::models::{clamp01, clamp_signed, SentimentCategory, SentimentResult};
use crate::text::features::TextFeatures;
use crate::text::lexicon::lexicon;

use super::traits::SentimentAnalyzer;

/// Default lexical analyzer.
pub struct LexicalSentimentAnalyzer {
    /// Token count at which length stops adding confidence
    pub confidence_saturation_tokens: usize,
    /// Below this many tokens confidence is halved
    pub short_text_tokens: usize,
}

impl Default for LexicalSentimentAnalyzer {
    fn default() -> Self {
        Self {
            confidence_saturation_tokens: 25,
            short_text_tokens: 5,
        }
    }
}

impl SentimentAnalyzer for LexicalSentimentAnalyzer {
    fn analyze_features(&self, text: &str, features: &TextFeatures) -> SentimentResult {
        if features.is_empty() || text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let (polarity, subjectivity, hits) = lexical_polarity(&features.tokens);
        let intensity = emotional_intensity(features);
        let keyword_sentiment = lexicon().keyword_sentiment(&features.tokens);

        let overall_score = clamp_signed(0.75 * polarity + 0.25 * sign(polarity) * intensity);

        let confidence = self.confidence(features.word_count, polarity, keyword_sentiment);
        let manipulation = manipulation_indicators(features, polarity, subjectivity, hits);

        SentimentResult {
            polarity,
            subjectivity,
            overall_score,
            confidence,
            category: SentimentCategory::from_polarity(polarity),
            intensity,
            manipulation_indicators: manipulation,
            keyword_sentiment,
        }
    }
}

impl LexicalSentimentAnalyzer {
    /// Length-driven confidence, softened when the lexical polarity and the
    /// keyword opinion disagree.
    fn confidence(&self, word_count: usize, polarity: f64, keyword_sentiment: f64) -> f64 {
        let saturation = self.confidence_saturation_tokens.max(1) as f64;
        let length = (word_count as f64 / saturation).min(1.0);
        let mut confidence = 0.3 + 0.7 * length;
        if word_count < self.short_text_tokens {
            confidence *= 0.5;
        }
        let agreement = 1.0 - (polarity - keyword_sentiment).abs() / 2.0;
        clamp01(confidence * (0.8 + 0.2 * agreement))
    }
}

/// Returns (polarity, subjectivity, lexicon hits).
fn lexical_polarity(tokens: &[String]) -> (f64, f64, usize) {
    let lex = lexicon();
    let mut polarity_sum = 0.0;
    let mut subjectivity_sum = 0.0;
    let mut hits = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some((mut polarity, subjectivity)) = lex.polarity(token) else {
            continue;
        };
        if i > 0 {
            if let Some(multiplier) = lex.intensifier(&tokens[i - 1]) {
                polarity = clamp_signed(polarity * multiplier);
            }
        }
        let negated = tokens[i.saturating_sub(3)..i]
            .iter()
            .any(|t| lex.is_negation(t));
        if negated {
            polarity *= -0.5;
        }
        polarity_sum += polarity;
        subjectivity_sum += subjectivity;
        hits += 1;
    }

    if hits == 0 {
        return (0.0, 0.0, 0);
    }
    (
        clamp_signed(polarity_sum / hits as f64),
        clamp01(subjectivity_sum / hits as f64),
        hits,
    )
}

/// Exclamation marks, capitals and intense adverbs, capped at 1.0.
fn emotional_intensity(features: &TextFeatures) -> f64 {
    clamp01(
        features.exclamation_count as f64 * 0.1
            + features.caps_ratio
            + features.intense_count as f64 * 0.1,
    )
}

fn manipulation_indicators(
    features: &TextFeatures,
    polarity: f64,
    subjectivity: f64,
    hits: usize,
) -> f64 {
    let mut score = 0.0;

    // Shouting: full penalty once 70% of letters are capitals
    if features.caps_ratio > 0.3 {
        score += 0.3 * clamp01((features.caps_ratio - 0.3) / 0.4);
    }

    if features.max_superlative_repeat >= 2 {
        score += (0.15 * (features.max_superlative_repeat - 1) as f64).min(0.3);
    }
    if features.superlative_count >= 2 && features.superlative_density() > 0.3 {
        score += 0.15;
    }

    score += (0.1 * features.punctuation_runs as f64).min(0.2);
    if features.exclamation_count >= 3 {
        score += 0.1;
    }

    if features.longest_repeat_run >= 3 {
        score += 0.2;
    }

    score += 0.2 * features.template_similarity;

    // Saturated with opinion words
    if hits >= 3 && hits as f64 / features.word_count as f64 > 0.5 {
        score += 0.15;
    }

    // Inauthentic certainty: extreme verdict, little subjective texture
    if polarity.abs() > 0.7 && subjectivity < 0.4 {
        score += 0.2;
    }

    clamp01(score)
}

/// Sign of a score, with 0.0 for zero (unlike f64::signum).
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
