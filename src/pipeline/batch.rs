// Batch analysis: score a set of reviews with full cross-review context.
//
// Three phases:
// 0. Validate every review and run text analysis (parallel). Invalid
//    reviews, including those missing a timestamp, fail individually.
// 1. Run anomaly detection over the valid reviews. Needs the whole set, so
//    this is the one sequential barrier.
// 2. Score each valid review with its credibility and worst anomaly
//    severity (parallel).
//
// Each anomaly's trust_score is then filled with the mean trust of its
// member reviews.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, TrustError};
use crate::models::{AnomalyRecord, Review, ReviewerDirectory, TrustScoreResult};
use crate::scoring::credibility::{CredibilityProfile, HistoryEntry};

use super::engine::{Prepared, TrustEngine};

/// Outcome for one review of a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub review: Review,
    pub outcome: Result<TrustScoreResult>,
}

/// A successfully scored review.
#[derive(Debug, Clone, Copy)]
pub struct ScoredReview<'a> {
    pub review: &'a Review,
    pub result: &'a TrustScoreResult,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchAnalysis {
    #[serde(skip)]
    pub items: Vec<BatchItem>,
    pub anomalies: Vec<AnomalyRecord>,
    /// Mean per-review fake probability over successfully scored reviews
    pub fake_probability: f64,
    /// Severity-weighted anomaly coverage reported by the detector
    pub anomaly_coverage: f64,
    /// Credibility profiles of reviewers found in the directory
    #[serde(skip)]
    pub credibility: HashMap<String, CredibilityProfile>,
}

impl BatchAnalysis {
    pub fn scored(&self) -> Vec<ScoredReview<'_>> {
        self.items
            .iter()
            .filter_map(|item| {
                item.outcome.as_ref().ok().map(|result| ScoredReview {
                    review: &item.review,
                    result,
                })
            })
            .collect()
    }

    pub fn failures(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_err()).count()
    }
}

impl TrustEngine {
    /// Score a batch of reviews. Per-review validation failures are reported
    /// in that review's item; only an engine fault fails the whole call.
    pub fn analyze_batch(
        &self,
        reviews: &[Review],
        reviewers: &ReviewerDirectory,
    ) -> Result<BatchAnalysis> {
        if reviews.is_empty() {
            return Ok(BatchAnalysis::default());
        }

        // Phase 0: validation and text analysis
        let prepared: Vec<Result<Prepared>> = reviews
            .par_iter()
            .map(|review| {
                review.validate()?;
                if review.timestamp.is_none() {
                    return Err(TrustError::input(
                        "timestamp is required for batch analysis",
                    ));
                }
                Ok(self.prepare(review))
            })
            .collect();

        let valid: Vec<usize> = prepared
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_ok().then_some(i))
            .collect();

        // Phase 1: anomaly detection over the valid reviews
        let valid_reviews: Vec<&Review> = valid.iter().map(|&i| &reviews[i]).collect();
        let sentiments: Vec<f64> = valid
            .iter()
            .filter_map(|&i| prepared[i].as_ref().ok())
            .map(|p| p.sentiment.overall_score)
            .collect();
        let detection = self
            .detector
            .detect_with_sentiment(&valid_reviews, &sentiments, reviewers)?;

        let credibility = self.reviewer_credibility(&valid_reviews, &sentiments, reviewers);

        // Phase 2: per-review scoring
        let scored: Vec<TrustScoreResult> = valid
            .par_iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                let review = &reviews[index];
                let prep = prepared[index].as_ref().ok()?;
                let reviewer = reviewers.get(&review.reviewer_id);
                let reviewer_credibility = credibility.get(&review.reviewer_id).map(|c| c.score);
                Some(self.score_prepared(
                    review,
                    prep,
                    reviewer,
                    reviewer_credibility,
                    detection.max_severity(position),
                ))
            })
            .collect();

        if scored.len() != valid.len() {
            return Err(TrustError::internal("batch scoring lost track of a review"));
        }

        let mut anomalies = detection.anomalies.clone();
        for (anomaly_index, anomaly) in anomalies.iter_mut().enumerate() {
            let mut member_scores: Vec<f64> = detection
                .memberships
                .iter()
                .enumerate()
                .filter(|(_, m)| m.contains(&anomaly_index))
                .map(|(position, _)| scored[position].trust_score)
                .collect();
            if !member_scores.is_empty() {
                // Sorted so the float sum is independent of input order
                member_scores.sort_by(f64::total_cmp);
                anomaly.trust_score =
                    Some(member_scores.iter().sum::<f64>() / member_scores.len() as f64);
            }
        }

        let fake_probability = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|r| r.fake_probability).sum::<f64>() / scored.len() as f64
        };

        let mut results = scored.into_iter();
        let items: Vec<BatchItem> = reviews
            .iter()
            .zip(prepared)
            .map(|(review, prep)| BatchItem {
                review: review.clone(),
                outcome: match prep {
                    Ok(_) => results
                        .next()
                        .ok_or_else(|| TrustError::internal("missing batch result")),
                    Err(e) => Err(e),
                },
            })
            .collect();

        let analysis = BatchAnalysis {
            items,
            anomalies,
            fake_probability,
            anomaly_coverage: detection.fake_probability,
            credibility,
        };

        info!(
            reviews = reviews.len(),
            failed = analysis.failures(),
            anomalies = analysis.anomalies.len(),
            "Batch analyzed"
        );
        Ok(analysis)
    }

    /// Credibility for every reviewer in the batch that has a profile, using
    /// their reviews in the batch as history.
    fn reviewer_credibility(
        &self,
        reviews: &[&Review],
        sentiments: &[f64],
        reviewers: &ReviewerDirectory,
    ) -> HashMap<String, CredibilityProfile> {
        let mut histories: HashMap<&str, Vec<HistoryEntry>> = HashMap::new();
        for (review, sentiment) in reviews.iter().zip(sentiments) {
            histories
                .entry(review.reviewer_id.as_str())
                .or_default()
                .push(HistoryEntry {
                    location_id: review.location_id.clone(),
                    timestamp: review.timestamp,
                    sentiment: *sentiment,
                });
        }

        histories
            .into_iter()
            .filter_map(|(id, mut history)| {
                let profile = reviewers.get(id)?;
                history.sort_by(|a, b| {
                    (a.timestamp, &a.location_id)
                        .cmp(&(b.timestamp, &b.location_id))
                        .then_with(|| a.sentiment.total_cmp(&b.sentiment))
                });
                Some((id.to_string(), self.credibility.profile(profile, &history)))
            })
            .collect()
    }
}
