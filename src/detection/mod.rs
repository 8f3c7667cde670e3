// Fake review detection: anomalies across a set of reviews, and the
// per-review fake probability.
//
// Detection runs over a whole batch (one location's reviews, one reviewer's
// history, or a bulk request). Every review must carry a timestamp. Results
// do not depend on the order reviews arrive in: the batch is sorted by
// (timestamp, input position) before any detector sees it, and anomalies
// are reported in (timestamp, type) order.

pub mod network;
pub mod outlier;
pub mod temporal;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TrustError};
use crate::models::{clamp01, AnomalyRecord, Review, ReviewerDirectory};
use crate::sentiment::lexical::LexicalSentimentAnalyzer;
use crate::sentiment::traits::SentimentAnalyzer;

/// Thresholds for every detector. Defaults are tuned for restaurant-style
/// review streams.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Width of the sliding burst window
    pub burst_window: Duration,
    /// A window is a burst above this multiple of the trailing average
    pub burst_multiplier: f64,
    /// How many preceding windows form the trailing average
    pub burst_lookback_windows: usize,
    /// Floor for the trailing average, so a quiet history doesn't make
    /// every small cluster a burst
    pub min_burst_baseline: f64,
    pub min_burst_size: usize,
    /// Max time between two reviews for them to be linked
    pub coordination_window: Duration,
    /// Token Jaccard at or above which two texts are near-duplicates
    pub similarity_threshold: f64,
    pub min_cluster_reviewers: usize,
    /// Robust (median/MAD) z-score above which a reviewer is an outlier
    pub outlier_z_threshold: f64,
    /// Minimum reviewers in the batch before outlier statistics are computed
    pub min_population: usize,
    pub min_reviews_for_uniformity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            burst_window: Duration::hours(24),
            burst_multiplier: 3.0,
            burst_lookback_windows: 7,
            min_burst_baseline: 1.0,
            min_burst_size: 5,
            coordination_window: Duration::hours(1),
            similarity_threshold: 0.7,
            min_cluster_reviewers: 3,
            outlier_z_threshold: 2.0,
            min_population: 5,
            min_reviews_for_uniformity: 3,
        }
    }
}

/// Weights of the per-review fake probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeProbabilityWeights {
    /// Applied to 1 - authenticity
    pub authenticity: f64,
    /// Applied to 1 - reviewer credibility
    pub credibility: f64,
    /// Applied to the severity of the worst anomaly the review is part of
    pub anomaly: f64,
}

impl Default for FakeProbabilityWeights {
    fn default() -> Self {
        Self {
            authenticity: 0.45,
            credibility: 0.30,
            anomaly: 0.25,
        }
    }
}

/// Probability that one review is fake. Rises as authenticity and
/// credibility fall and as anomaly severity rises.
pub fn fake_probability(
    authenticity: f64,
    credibility: f64,
    anomaly_severity: Option<f64>,
    weights: &FakeProbabilityWeights,
) -> f64 {
    clamp01(
        weights.authenticity * (1.0 - clamp01(authenticity))
            + weights.credibility * (1.0 - clamp01(credibility))
            + weights.anomaly * anomaly_severity.map(clamp01).unwrap_or(0.0),
    )
}

/// A review placed on the batch timeline.
pub struct Timed<'a> {
    /// Position in the caller's slice
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub review: &'a Review,
    /// Overall sentiment score
    pub sentiment: f64,
}

/// An anomaly plus the input positions of its reviews.
#[derive(Debug, Clone)]
pub struct Finding {
    pub record: AnomalyRecord,
    pub members: Vec<usize>,
}

/// Detector output for one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    pub anomalies: Vec<AnomalyRecord>,
    /// For each input review, indices into `anomalies` it belongs to
    #[serde(skip)]
    pub memberships: Vec<Vec<usize>>,
    /// Severity-weighted share of the batch caught in an anomaly
    pub fake_probability: f64,
}

impl Detection {
    fn empty(len: usize) -> Self {
        Self {
            anomalies: Vec::new(),
            memberships: vec![Vec::new(); len],
            fake_probability: 0.0,
        }
    }

    /// Highest severity among the anomalies a review belongs to.
    pub fn max_severity(&self, index: usize) -> Option<f64> {
        self.memberships
            .get(index)?
            .iter()
            .filter_map(|&a| self.anomalies.get(a).map(|r| r.severity))
            .reduce(f64::max)
    }

    /// Anomalies a review belongs to.
    pub fn anomalies_for(&self, index: usize) -> impl Iterator<Item = &AnomalyRecord> + '_ {
        self.memberships
            .get(index)
            .into_iter()
            .flatten()
            .filter_map(|&a| self.anomalies.get(a))
    }
}

/// Runs every detector over a batch.
#[derive(Debug, Clone, Default)]
pub struct FakeReviewDetector {
    pub config: DetectorConfig,
}

impl FakeReviewDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect anomalies, scoring sentiment with the default analyzer.
    pub fn detect(&self, reviews: &[Review], reviewers: &ReviewerDirectory) -> Result<Detection> {
        let analyzer = LexicalSentimentAnalyzer::default();
        let refs: Vec<&Review> = reviews.iter().collect();
        let sentiments: Vec<f64> = reviews
            .iter()
            .map(|r| analyzer.analyze(&r.text).overall_score)
            .collect();
        self.detect_with_sentiment(&refs, &sentiments, reviewers)
    }

    /// Detect anomalies given each review's overall sentiment score.
    pub fn detect_with_sentiment(
        &self,
        reviews: &[&Review],
        sentiments: &[f64],
        reviewers: &ReviewerDirectory,
    ) -> Result<Detection> {
        if reviews.len() != sentiments.len() {
            return Err(TrustError::internal(format!(
                "{} reviews but {} sentiment scores",
                reviews.len(),
                sentiments.len()
            )));
        }
        if reviews.is_empty() {
            return Ok(Detection::empty(0));
        }

        let mut timeline = Vec::with_capacity(reviews.len());
        for (index, review) in reviews.iter().enumerate() {
            let timestamp = review.timestamp.ok_or_else(|| {
                TrustError::input(format!(
                    "review {} has no timestamp",
                    review.id.clone().unwrap_or_else(|| index.to_string())
                ))
            })?;
            timeline.push(Timed {
                index,
                timestamp,
                review: *review,
                sentiment: sentiments[index],
            });
        }
        timeline.sort_by_key(|t| (t.timestamp, t.index));

        let mut findings = temporal::detect_bursts(&timeline, &self.config);
        findings.extend(network::detect_coordination(&timeline, &self.config));
        findings.extend(outlier::detect_velocity_outliers(&timeline, reviewers, &self.config));
        findings.extend(outlier::detect_sentiment_uniformity(&timeline, &self.config));

        // Deterministic report order regardless of input order
        findings.sort_by(|a, b| {
            (a.record.timestamp, a.record.anomaly_type, &a.record.reviewer_ids)
                .cmp(&(b.record.timestamp, b.record.anomaly_type, &b.record.reviewer_ids))
        });

        let mut detection = Detection::empty(reviews.len());
        for (anomaly_index, finding) in findings.into_iter().enumerate() {
            for member in &finding.members {
                detection.memberships[*member].push(anomaly_index);
            }
            debug!(
                anomaly = %finding.record.anomaly_type,
                severity = finding.record.severity,
                reviews = finding.record.review_count,
                "Anomaly detected"
            );
            detection.anomalies.push(finding.record);
        }

        let covered: f64 = (0..reviews.len())
            .filter_map(|i| detection.max_severity(i))
            .sum();
        detection.fake_probability = clamp01(covered / reviews.len() as f64);

        Ok(detection)
    }
}
