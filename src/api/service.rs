// Trust service: the public entry points.
//
// Each operation comes in two forms:
// - `try_*` returns a typed Result, for transports that need the error kind
//   (the HTTP layer maps it to a status code)
// - the plain form returns the JSON envelope and never fails
//
// Dashboard and reviewer lookups re-analyze the dataset on every call so
// that network and burst detection see every location and reviewer.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::location::{location_trust, summarize_location, LocationSummary};
use crate::aggregate::reviewer::{summarize_reviewer, ReviewerSummary};
use crate::aggregate::AggregateOptions;
use crate::dataset::ReviewDataset;
use crate::error::{Result, TrustError};
use crate::media::{ImageVerification, ImageVerifier, NoopImageVerifier};
use crate::models::{
    AnomalyRecord, LocationContext, Review, ReviewerDirectory, ReviewerProfile, TrustScoreResult,
};
use crate::pipeline::TrustEngine;

use super::envelope::ApiResponse;
use super::requests::{AnalyzeReviewRequest, BulkReviewItem, ImageVerifyRequest};

/// Bulk results above this trust count as trusted.
pub const TRUSTED_THRESHOLD: f64 = 0.7;
/// Bulk results below this trust count as suspicious.
pub const SUSPICIOUS_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceOptions {
    pub max_bulk_reviews: usize,
    pub aggregate: AggregateOptions,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            max_bulk_reviews: 100,
            aggregate: AggregateOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkSummary {
    pub total_reviews: usize,
    pub trusted_reviews: usize,
    pub suspicious_reviews: usize,
    pub failed_reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustTrendPoint {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub trust_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAnalysis {
    pub location_trust_score: f64,
    pub summary: BulkSummary,
    pub trust_trends: Vec<TrustTrendPoint>,
    pub anomalies: Vec<AnomalyRecord>,
    /// One envelope per request item, in request order
    pub individual_results: Vec<ApiResponse<TrustScoreResult>>,
}

pub struct TrustService {
    engine: TrustEngine,
    dataset: ReviewDataset,
    options: ServiceOptions,
    image_verifier: Box<dyn ImageVerifier>,
}

impl TrustService {
    pub fn new(engine: TrustEngine, dataset: ReviewDataset, options: ServiceOptions) -> Self {
        Self {
            engine,
            dataset,
            options,
            image_verifier: Box::new(NoopImageVerifier),
        }
    }

    pub fn with_image_verifier(mut self, verifier: Box<dyn ImageVerifier>) -> Self {
        self.image_verifier = verifier;
        self
    }

    pub fn engine(&self) -> &TrustEngine {
        &self.engine
    }

    pub fn dataset(&self) -> &ReviewDataset {
        &self.dataset
    }

    // ---- analyze_review ----

    pub fn try_analyze_review(&self, request: &AnalyzeReviewRequest) -> Result<TrustScoreResult> {
        let (review, profile) = request.to_review()?;
        self.engine.analyze_review(&review, Some(&profile))
    }

    pub fn analyze_review(&self, request: &AnalyzeReviewRequest) -> ApiResponse<TrustScoreResult> {
        ApiResponse::from_result(self.try_analyze_review(request), "analyze_review")
    }

    // ---- analyze_bulk_reviews ----

    pub fn try_analyze_bulk(&self, items: &[BulkReviewItem]) -> Result<BulkAnalysis> {
        if items.len() > self.options.max_bulk_reviews {
            return Err(TrustError::validation(format!(
                "bulk requests are limited to {} reviews, got {}",
                self.options.max_bulk_reviews,
                items.len()
            )));
        }

        // Conversion failures stay attached to their item
        let converted: Vec<Result<(Review, ReviewerProfile)>> = items
            .iter()
            .enumerate()
            .map(|(position, item)| item.to_review(position))
            .collect();

        // Supplied reviewer data wins over the empty profile of items that
        // only name the reviewer. Disagreeing supplied profiles fail every
        // item that supplied one.
        let mut supplied: HashMap<&str, &ReviewerProfile> = HashMap::new();
        let mut conflicting: HashSet<&str> = HashSet::new();
        for (item, outcome) in items.iter().zip(&converted) {
            if let (Some(_), Ok((review, profile))) = (&item.reviewer_data, outcome) {
                let id = review.reviewer_id.as_str();
                match supplied.get(id) {
                    Some(existing) if *existing != profile => {
                        conflicting.insert(id);
                    }
                    Some(_) => {}
                    None => {
                        supplied.insert(id, profile);
                    }
                }
            }
        }

        let mut reviews = Vec::with_capacity(items.len());
        let mut directory = ReviewerDirectory::new();
        let mut slots: Vec<std::result::Result<usize, TrustError>> = Vec::with_capacity(items.len());
        for (item, outcome) in items.iter().zip(&converted) {
            match outcome {
                Ok((review, _)) => {
                    let id = review.reviewer_id.as_str();
                    if item.reviewer_data.is_some() && conflicting.contains(id) {
                        slots.push(Err(TrustError::validation(format!(
                            "conflicting reviewer_data for reviewer {id}"
                        ))));
                        continue;
                    }
                    let profile = supplied
                        .get(id)
                        .filter(|_| !conflicting.contains(id))
                        .map(|p| (*p).clone())
                        .unwrap_or_default();
                    directory.entry(id.to_string()).or_insert(profile);
                    reviews.push(review.clone());
                    slots.push(Ok(reviews.len() - 1));
                }
                Err(e) => slots.push(Err(e.clone())),
            }
        }

        let analysis = self.engine.analyze_batch(&reviews, &directory)?;

        let individual_results: Vec<ApiResponse<TrustScoreResult>> = slots
            .iter()
            .map(|slot| match slot {
                Ok(i) => match analysis.items.get(*i).map(|item| &item.outcome) {
                    Some(Ok(result)) => ApiResponse::ok(result.clone()),
                    Some(Err(e)) => ApiResponse::failure(e),
                    None => ApiResponse::failure(&TrustError::internal("missing batch item")),
                },
                Err(e) => ApiResponse::failure(e),
            })
            .collect();

        let scored = analysis.scored();
        let scores: Vec<f64> = scored.iter().map(|s| s.result.trust_score).collect();
        let trust_trends = scored
            .iter()
            .filter_map(|s| {
                s.review.timestamp.map(|timestamp| TrustTrendPoint {
                    timestamp,
                    trust_score: s.result.trust_score,
                })
            })
            .collect();

        let summary = BulkSummary {
            total_reviews: items.len(),
            trusted_reviews: scores.iter().filter(|s| **s > TRUSTED_THRESHOLD).count(),
            suspicious_reviews: scores.iter().filter(|s| **s < SUSPICIOUS_THRESHOLD).count(),
            failed_reviews: individual_results.iter().filter(|r| !r.success).count(),
        };

        info!(
            total = summary.total_reviews,
            trusted = summary.trusted_reviews,
            suspicious = summary.suspicious_reviews,
            failed = summary.failed_reviews,
            "Bulk analysis complete"
        );

        Ok(BulkAnalysis {
            location_trust_score: location_trust(&scores),
            summary,
            trust_trends,
            anomalies: analysis.anomalies.clone(),
            individual_results,
        })
    }

    pub fn analyze_bulk_reviews(&self, items: &[BulkReviewItem]) -> ApiResponse<BulkAnalysis> {
        ApiResponse::from_result(self.try_analyze_bulk(items), "analyze_bulk_reviews")
    }

    // ---- get_trust_dashboard_data ----

    pub fn try_dashboard(&self, location_id: &str) -> Result<LocationSummary> {
        if !self.dataset.knows_location(location_id) {
            return Err(TrustError::input(format!("unknown location: {location_id}")));
        }
        let location = self
            .dataset
            .location(location_id)
            .cloned()
            .unwrap_or_else(|| LocationContext {
                id: location_id.to_string(),
                ..Default::default()
            });

        let analysis = self
            .engine
            .analyze_batch(&self.dataset.reviews, &self.dataset.reviewers)?;
        let scored: Vec<_> = analysis
            .scored()
            .into_iter()
            .filter(|s| s.review.location_id == location_id)
            .collect();
        let anomalies: Vec<AnomalyRecord> = analysis
            .anomalies
            .iter()
            .filter(|a| a.location_ids.iter().any(|l| l == location_id))
            .cloned()
            .collect();

        Ok(summarize_location(
            &location,
            &scored,
            &anomalies,
            &self.options.aggregate,
        ))
    }

    pub fn get_trust_dashboard_data(&self, location_id: &str) -> ApiResponse<LocationSummary> {
        ApiResponse::from_result(self.try_dashboard(location_id), "get_trust_dashboard_data")
    }

    // ---- get_reviewer_trust_profile ----

    pub fn try_reviewer_profile(&self, reviewer_id: &str) -> Result<ReviewerSummary> {
        let has_reviews = self
            .dataset
            .reviews
            .iter()
            .any(|r| r.reviewer_id == reviewer_id);
        let profile = match self.dataset.reviewer(reviewer_id) {
            Some(profile) => profile.clone(),
            None if has_reviews => ReviewerProfile::default(),
            None => return Err(TrustError::input(format!("unknown reviewer: {reviewer_id}"))),
        };

        let analysis = self
            .engine
            .analyze_batch(&self.dataset.reviews, &self.dataset.reviewers)?;
        let scored: Vec<_> = analysis
            .scored()
            .into_iter()
            .filter(|s| s.review.reviewer_id == reviewer_id)
            .collect();
        let anomalies: Vec<AnomalyRecord> = analysis
            .anomalies
            .iter()
            .filter(|a| a.reviewer_ids.iter().any(|r| r == reviewer_id))
            .cloned()
            .collect();
        let credibility = analysis
            .credibility
            .get(reviewer_id)
            .cloned()
            .unwrap_or_else(|| self.engine.credibility().profile(&profile, &[]));

        Ok(summarize_reviewer(
            reviewer_id,
            &profile,
            &credibility,
            &scored,
            &anomalies,
            &self.options.aggregate,
        ))
    }

    pub fn get_reviewer_trust_profile(&self, reviewer_id: &str) -> ApiResponse<ReviewerSummary> {
        ApiResponse::from_result(
            self.try_reviewer_profile(reviewer_id),
            "get_reviewer_trust_profile",
        )
    }

    // ---- verify_image_authenticity ----

    pub fn try_verify_image(&self, request: &ImageVerifyRequest) -> Result<ImageVerification> {
        self.image_verifier
            .verify(&request.image_data, &request.location_data)
    }

    pub fn verify_image_authenticity(
        &self,
        request: &ImageVerifyRequest,
    ) -> ApiResponse<ImageVerification> {
        ApiResponse::from_result(self.try_verify_image(request), "verify_image_authenticity")
    }
}
