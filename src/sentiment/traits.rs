// Sentiment analyzer trait: swap-ready abstraction.
//
// The default implementation is lexicon-based and fully deterministic. A
// model-backed analyzer can replace it without touching the rest of the
// pipeline, as long as it stays synchronous and side-effect free.

use crate::models::SentimentResult;
use crate::text::features::TextFeatures;

/// Trait for turning review text into a sentiment reading.
pub trait SentimentAnalyzer: Send + Sync {
    /// Analyze text whose features have already been extracted.
    fn analyze_features(&self, text: &str, features: &TextFeatures) -> SentimentResult;

    /// Analyze raw text. Never fails: blank text yields a neutral,
    /// zero-confidence result.
    fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }
        let features = TextFeatures::extract(text);
        self.analyze_features(text, &features)
    }
}
