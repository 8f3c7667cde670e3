// Composition tests: the public service operations end to end.
//
// Each section drives TrustService the way the CLI and HTTP layer do,
// from request payloads through the JSON envelope.

use chrono::{DateTime, Duration, TimeZone, Utc};
use veracity::api::{
    AnalyzeReviewRequest, BulkReviewItem, ImageVerifyRequest, RawReviewerData, ServiceOptions,
    TrustService,
};
use veracity::dataset::ReviewDataset;
use veracity::error::Result;
use veracity::media::{ImageVerification, ImageVerifier};
use veracity::models::{
    AnomalyType, LocationContext, Review, ReviewerDirectory, ReviewerProfile, TrustLabel,
};
use veracity::pipeline::TrustEngine;
use veracity::scoring::credibility::VerificationStatus;

fn service(dataset: ReviewDataset) -> TrustService {
    TrustService::new(TrustEngine::default(), dataset, ServiceOptions::default())
}

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::minutes(minutes)
}

// ============================================================
// Single review scenarios
// ============================================================

#[test]
fn shouted_superlatives_from_unknown_account_are_low_trust() {
    let request = AnalyzeReviewRequest::from_text("AMAZING AMAZING AMAZING BEST PLACE EVER!!!");
    let result = service(ReviewDataset::default())
        .try_analyze_review(&request)
        .unwrap();

    assert!(
        result.sentiment_score.manipulation_indicators > 0.5,
        "Expected heavy manipulation, got {}",
        result.sentiment_score.manipulation_indicators
    );
    assert!(result.authenticity_score < 0.3, "got {}", result.authenticity_score);
    assert!(result.trust_score < 0.4, "Expected < 0.4, got {}", result.trust_score);
    assert_eq!(result.trust_label, TrustLabel::LowTrust);
    assert!(result.explanation.contains("low authenticity score"));
}

#[test]
fn specific_review_from_established_account_is_trusted() {
    let request = AnalyzeReviewRequest {
        text: "Really enjoyed our dinner here. Fresh ingredients and great portions.".into(),
        reviewer_data: Some(RawReviewerData {
            account_age_days: Some(365),
            review_count: Some(25),
            verified_email: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let result = service(ReviewDataset::default())
        .try_analyze_review(&request)
        .unwrap();

    assert!(
        (result.reviewer_credibility - 0.715).abs() < 0.01,
        "Expected ~0.715, got {}",
        result.reviewer_credibility
    );
    assert!(result.trust_score > 0.7, "Expected > 0.7, got {}", result.trust_score);
    assert!(result.trust_label >= TrustLabel::Trusted);
    assert!(result.fake_probability < 0.3, "got {}", result.fake_probability);
}

#[test]
fn empty_text_is_untrusted() {
    let result = service(ReviewDataset::default())
        .try_analyze_review(&AnalyzeReviewRequest::from_text(""))
        .unwrap();
    assert_eq!(result.trust_score, 0.0);
    assert_eq!(result.trust_label, TrustLabel::Untrusted);
    assert_eq!(result.fake_probability, 1.0);
}

#[test]
fn repeated_analysis_is_identical() {
    let svc = service(ReviewDataset::default());
    let request = AnalyzeReviewRequest {
        text: "Lamb shoulder was tender, service a bit slow on a busy Friday".into(),
        rating: Some(4),
        ..Default::default()
    };
    let first = svc.try_analyze_review(&request).unwrap();
    let second = svc.try_analyze_review(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn better_credentials_never_lower_trust() {
    let svc = service(ReviewDataset::default());
    let text = "Decent coffee, the croissant was flaky and warm";
    let mut previous = 0.0;
    for (age, count) in [(0, 0), (30, 3), (180, 15), (365, 40), (900, 120)] {
        let request = AnalyzeReviewRequest {
            text: text.into(),
            reviewer_data: Some(RawReviewerData {
                account_age_days: Some(age),
                review_count: Some(count),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = svc.try_analyze_review(&request).unwrap();
        assert!(
            result.reviewer_credibility >= previous,
            "age {age}: {} < {previous}",
            result.reviewer_credibility
        );
        previous = result.reviewer_credibility;
    }
}

// ============================================================
// Envelope shape
// ============================================================

#[test]
fn success_envelope_flattens_result() {
    let response = service(ReviewDataset::default())
        .analyze_review(&AnalyzeReviewRequest::from_text("Nice patio, cold beer"));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["trust_score"].is_number());
    assert!(json["trust_label"].is_string());
    assert!(json["analysis"]["risk_factors"].is_object());
    assert!(json.get("error").is_none());
}

#[test]
fn invalid_input_becomes_failure_envelope() {
    let svc = service(ReviewDataset::default());
    let bad_rating = AnalyzeReviewRequest {
        text: "Fine".into(),
        rating: Some(9),
        ..Default::default()
    };
    let response = svc.analyze_review(&bad_rating);
    assert!(!response.success);
    assert!(response.data.is_none());
    assert!(response.error.as_deref().unwrap().contains("rating"));

    let negative_age = AnalyzeReviewRequest {
        text: "Fine".into(),
        reviewer_data: Some(RawReviewerData {
            account_age_days: Some(-3),
            ..Default::default()
        }),
        ..Default::default()
    };
    let response = svc.analyze_review(&negative_age);
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("account_age_days"));
}

// ============================================================
// Bulk analysis
// ============================================================

fn coordinated_item(i: usize) -> BulkReviewItem {
    BulkReviewItem {
        id: Some(format!("r{i}")),
        text: "Best tacos in town, friendly staff and quick service".into(),
        reviewer_id: Some(format!("user-{i}")),
        location_data: Some(LocationContext {
            id: "loc-1".into(),
            ..Default::default()
        }),
        rating: Some(5),
        timestamp: Some(at(8 * i as i64)),
        ..Default::default()
    }
}

#[test]
fn coordinated_burst_is_detected_in_bulk() {
    let items: Vec<BulkReviewItem> = (0..15).map(coordinated_item).collect();
    let analysis = service(ReviewDataset::default())
        .try_analyze_bulk(&items)
        .unwrap();

    let burst = analysis
        .anomalies
        .iter()
        .find(|a| a.anomaly_type == AnomalyType::ReviewBombing)
        .expect("burst anomaly");
    assert_eq!(burst.review_count, 15);
    assert!(burst.severity >= 0.5, "got {}", burst.severity);
    assert!(burst.trust_score.is_some());

    let network = analysis
        .anomalies
        .iter()
        .find(|a| a.anomaly_type == AnomalyType::CoordinatedNetwork)
        .expect("network anomaly");
    assert_eq!(network.reviewer_ids.len(), 15);
    assert!(network.severity >= 0.85, "got {}", network.severity);

    assert_eq!(analysis.summary.total_reviews, 15);
    assert_eq!(analysis.summary.failed_reviews, 0);
    assert_eq!(analysis.individual_results.len(), 15);
    for response in &analysis.individual_results {
        let result = response.data.as_ref().unwrap();
        assert!(result.temporal_consistency < 0.3);
    }
}

#[test]
fn coordination_lowers_trust_against_the_same_reviews_spread_out() {
    let svc = service(ReviewDataset::default());
    let clustered: Vec<BulkReviewItem> = (0..15).map(coordinated_item).collect();
    let spread: Vec<BulkReviewItem> = (0..15)
        .map(|i| BulkReviewItem {
            timestamp: Some(at(60 * 24 * 3 * i as i64)),
            ..coordinated_item(i)
        })
        .collect();

    let clustered = svc.try_analyze_bulk(&clustered).unwrap();
    let spread = svc.try_analyze_bulk(&spread).unwrap();
    assert!(spread.anomalies.is_empty());

    let mean = |a: &veracity::api::BulkAnalysis| {
        a.trust_trends.iter().map(|p| p.trust_score).sum::<f64>() / a.trust_trends.len() as f64
    };
    assert!(mean(&clustered) < mean(&spread));
}

#[test]
fn bulk_failures_stay_with_their_item() {
    let mut items: Vec<BulkReviewItem> = (0..4)
        .map(|i| BulkReviewItem {
            text: format!("Visit {i}: soup was hot and the bread fresh"),
            timestamp: Some(at(60 * 30 * i as i64)),
            ..Default::default()
        })
        .collect();
    items[1].timestamp = None;
    items[2].reviewer_data = Some(RawReviewerData {
        review_count: Some(-1),
        ..Default::default()
    });

    let analysis = service(ReviewDataset::default())
        .try_analyze_bulk(&items)
        .unwrap();
    assert_eq!(analysis.summary.total_reviews, 4);
    assert_eq!(analysis.summary.failed_reviews, 2);
    assert!(analysis.individual_results[0].success);
    assert!(!analysis.individual_results[1].success);
    assert!(analysis.individual_results[1]
        .error
        .as_deref()
        .unwrap()
        .contains("timestamp"));
    assert!(!analysis.individual_results[2].success);
    assert!(analysis.individual_results[3].success);
}

fn veteran_item(text: &str, minutes: i64, age: i64) -> BulkReviewItem {
    BulkReviewItem {
        text: text.into(),
        reviewer_id: Some("u1".into()),
        reviewer_data: Some(RawReviewerData {
            account_age_days: Some(age),
            review_count: Some(60),
            verified_email: true,
            verified_phone: true,
            profile_photo: true,
            ..Default::default()
        }),
        timestamp: Some(at(minutes)),
        ..Default::default()
    }
}

fn bare_item(text: &str, minutes: i64) -> BulkReviewItem {
    BulkReviewItem {
        text: text.into(),
        reviewer_id: Some("u1".into()),
        timestamp: Some(at(minutes)),
        ..Default::default()
    }
}

#[test]
fn supplied_reviewer_data_wins_regardless_of_item_order() {
    let svc = service(ReviewDataset::default());
    let profiled = veteran_item("Grilled sardines, crisp white wine, lovely view", 0, 800);
    let bare = bare_item("Back again for the sardines, still excellent", 60 * 24 * 5);

    let forward = svc
        .try_analyze_bulk(&[profiled.clone(), bare.clone()])
        .unwrap();
    let backward = svc.try_analyze_bulk(&[bare, profiled]).unwrap();

    let credibility = |a: &veracity::api::BulkAnalysis, i: usize| {
        a.individual_results[i].data.as_ref().unwrap().reviewer_credibility
    };
    assert!(credibility(&forward, 0) > 0.8, "got {}", credibility(&forward, 0));
    assert_eq!(credibility(&forward, 0), credibility(&backward, 1));
    assert_eq!(credibility(&forward, 1), credibility(&backward, 0));
    assert_eq!(credibility(&forward, 0), credibility(&forward, 1));
}

#[test]
fn conflicting_reviewer_data_fails_the_supplying_items() {
    let items = [
        veteran_item("Grilled sardines, crisp white wine", 0, 800),
        veteran_item("Octopus was rubbery this time", 60 * 24 * 2, 30),
        bare_item("Fine espresso, nothing more", 60 * 24 * 4),
    ];
    let analysis = service(ReviewDataset::default())
        .try_analyze_bulk(&items)
        .unwrap();
    assert_eq!(analysis.summary.failed_reviews, 2);
    for response in &analysis.individual_results[..2] {
        assert!(!response.success);
        assert!(response.error.as_deref().unwrap().contains("conflicting"));
    }
    assert!(analysis.individual_results[2].success);
}

#[test]
fn oversized_bulk_request_is_rejected() {
    let items: Vec<BulkReviewItem> = (0..101)
        .map(|i| BulkReviewItem {
            text: format!("review {i}"),
            timestamp: Some(at(i as i64)),
            ..Default::default()
        })
        .collect();
    let response = service(ReviewDataset::default()).analyze_bulk_reviews(&items);
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("100"));
}

#[test]
fn empty_bulk_request_is_neutral() {
    let analysis = service(ReviewDataset::default())
        .try_analyze_bulk(&[])
        .unwrap();
    assert_eq!(analysis.summary.total_reviews, 0);
    assert_eq!(analysis.location_trust_score, 0.5);
    assert!(analysis.anomalies.is_empty());
}

// ============================================================
// Batch engine directly
// ============================================================

#[test]
fn batch_results_do_not_depend_on_input_order() {
    let engine = TrustEngine::default();
    let mut reviews: Vec<Review> = (0..15)
        .map(|i| {
            let (review, _) = coordinated_item(i).to_review(i).unwrap();
            review
        })
        .collect();
    let directory = ReviewerDirectory::new();

    let forward = engine.analyze_batch(&reviews, &directory).unwrap();
    reviews.reverse();
    let backward = engine.analyze_batch(&reviews, &directory).unwrap();

    assert_eq!(forward.anomalies, backward.anomalies);
    for item in &forward.items {
        let twin = backward
            .items
            .iter()
            .find(|other| other.review.id == item.review.id)
            .unwrap();
        assert_eq!(item.outcome, twin.outcome);
    }
}

// ============================================================
// Dataset lookups
// ============================================================

fn dataset() -> ReviewDataset {
    let mut reviewers = ReviewerDirectory::new();
    reviewers.insert(
        "rev-1".into(),
        ReviewerProfile {
            account_age_days: 400,
            review_count: 30,
            profile_photo: true,
            verified_email: true,
            verified_phone: true,
            bio: Some("Weekend brunch hunter".into()),
        },
    );
    // Posting rates spread from 0.04 to 0.12 per day, so nobody is an outlier
    for i in 2..=6 {
        reviewers.insert(
            format!("rev-{i}"),
            ReviewerProfile {
                account_age_days: 50 * i,
                review_count: i * i,
                verified_email: i % 2 == 0,
                ..Default::default()
            },
        );
    }

    let texts = [
        "Flat white was smooth and the banana bread still warm",
        "Waited twenty minutes for a table, eggs were overcooked",
        "Sunny terrace, friendly staff, prices are fair",
        "Avocado toast was bland but the juice was fresh",
        "Loud music made it hard to talk, pastries were good",
        "Quick takeaway service, the sandwich held up well",
    ];
    let day = |d: i64| Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap() + Duration::days(d);

    let mut reviews: Vec<Review> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Review {
            id: Some(format!("cafe-{i}")),
            text: text.to_string(),
            timestamp: Some(day(2 * i as i64)),
            rating: Some(3 + (i % 3) as u8),
            reviewer_id: format!("rev-{}", i + 1),
            location_id: "loc-1".into(),
        })
        .collect();
    reviews.push(Review {
        id: Some("grill-0".into()),
        text: "Grilled sea bass with lemon butter, generous portion".into(),
        timestamp: Some(day(3)),
        rating: Some(5),
        reviewer_id: "rev-1".into(),
        location_id: "loc-2".into(),
    });
    reviews.push(Review {
        id: Some("grill-1".into()),
        text: "Second visit, the chowder was as good as last time".into(),
        timestamp: Some(day(20)),
        rating: Some(4),
        reviewer_id: "rev-1".into(),
        location_id: "loc-2".into(),
    });

    ReviewDataset {
        locations: vec![
            LocationContext {
                id: "loc-1".into(),
                name: "Cafe Rio".into(),
                category: Some("cafe".into()),
            },
            LocationContext {
                id: "loc-2".into(),
                name: "Harbour Grill".into(),
                category: None,
            },
        ],
        reviewers,
        reviews,
    }
}

#[test]
fn dashboard_summarizes_one_location() {
    let summary = service(dataset()).try_dashboard("loc-1").unwrap();
    assert_eq!(summary.location_name, "Cafe Rio");
    assert_eq!(summary.total_reviews, 6);
    assert_eq!(summary.trust_distribution.total(), 6);
    assert_eq!(summary.trend_data.len(), 30);
    assert_eq!(summary.top_trusted_reviews.len(), 5);
    assert!((0.0..=1.0).contains(&summary.overall_trust_score));
    assert!(summary.anomalies.is_empty());
    // Six reviews keep the score close to neutral
    assert!((summary.overall_trust_score - 0.5).abs() < 0.1);
}

#[test]
fn unknown_location_is_an_error_envelope() {
    let response = service(dataset()).get_trust_dashboard_data("loc-404");
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("loc-404"));
}

#[test]
fn reviewer_profile_covers_all_locations() {
    let summary = service(dataset()).try_reviewer_profile("rev-1").unwrap();
    assert_eq!(summary.reviews_analyzed, 3);
    assert_eq!(summary.verification_status, VerificationStatus::Verified);
    assert_eq!(summary.recent_activity.len(), 3);
    assert_eq!(summary.recent_activity[0].review_id.as_deref(), Some("grill-1"));
    let diversity = summary.behavioral_analysis.location_diversity.unwrap();
    assert!((diversity - 2.0 / 3.0).abs() < 1e-9, "got {diversity}");
    assert!(summary.trust_label >= TrustLabel::Moderate);
}

#[test]
fn unknown_reviewer_is_an_error_envelope() {
    let response = service(dataset()).get_reviewer_trust_profile("nobody");
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("nobody"));
}

// ============================================================
// Image verification
// ============================================================

struct AlwaysAuthentic;

impl ImageVerifier for AlwaysAuthentic {
    fn verify(&self, _image: &str, location: &LocationContext) -> Result<ImageVerification> {
        Ok(ImageVerification {
            authentic: true,
            confidence: 0.9,
            notes: vec![format!("matched {}", location.id)],
        })
    }
}

#[test]
fn image_verification_without_backend_fails() {
    let request = ImageVerifyRequest {
        image_data: "aGVsbG8=".into(),
        location_data: LocationContext {
            id: "loc-1".into(),
            ..Default::default()
        },
    };
    let response = service(ReviewDataset::default()).verify_image_authenticity(&request);
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("not configured"));
}

#[test]
fn image_verification_uses_configured_backend() {
    let request = ImageVerifyRequest {
        image_data: "aGVsbG8=".into(),
        location_data: LocationContext {
            id: "loc-1".into(),
            ..Default::default()
        },
    };
    let svc = service(ReviewDataset::default()).with_image_verifier(Box::new(AlwaysAuthentic));
    let verification = svc.try_verify_image(&request).unwrap();
    assert!(verification.authentic);
    assert_eq!(verification.notes, vec!["matched loc-1".to_string()]);
}
