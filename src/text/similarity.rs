// Near-duplicate text similarity.
//
// Token-set Jaccard: |A ∩ B| / |A ∪ B|. Symmetric, 0.0 for disjoint texts
// and 1.0 for texts using the same words. Used both for fake-template
// matching (against a sliding phrase window) and for coordinated-network
// detection (whole review against whole review).

use std::collections::HashSet;
use std::hash::Hash;

use super::features::tokens;
use super::lexicon::lexicon;

/// A phrase window must reach this Jaccard score to count as a template hit.
pub const TEMPLATE_MATCH_THRESHOLD: f64 = 0.6;

/// Jaccard similarity of two sets. Two empty sets score 0.0; blank texts
/// are never treated as duplicates of each other.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Similarity of two whole texts.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = tokens(a).into_iter().collect();
    let set_b: HashSet<String> = tokens(b).into_iter().collect();
    jaccard(&set_a, &set_b)
}

/// Best Jaccard score between `phrase` and any window of `tokens` the same
/// length as the phrase.
pub fn phrase_similarity(tokens: &[String], phrase: &[String]) -> f64 {
    if tokens.is_empty() || phrase.is_empty() {
        return 0.0;
    }
    let phrase_set: HashSet<&str> = phrase.iter().map(String::as_str).collect();
    if tokens.len() <= phrase.len() {
        let window: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        return jaccard(&window, &phrase_set);
    }
    tokens
        .windows(phrase.len())
        .map(|w| {
            let window: HashSet<&str> = w.iter().map(String::as_str).collect();
            jaccard(&window, &phrase_set)
        })
        .fold(0.0, f64::max)
}

/// Highest template match for a tokenized review, or 0.0 when no template
/// reaches the match threshold.
pub fn template_similarity(tokens: &[String]) -> f64 {
    let best = lexicon()
        .templates
        .iter()
        .map(|template| phrase_similarity(tokens, template))
        .fold(0.0, f64::max);
    if best >= TEMPLATE_MATCH_THRESHOLD {
        best
    } else {
        0.0
    }
}
