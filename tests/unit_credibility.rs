// Unit tests for reviewer credibility profiling.

use chrono::{Duration, TimeZone, Utc};
use veracity::models::ReviewerProfile;
use veracity::scoring::credibility::{
    CredibilityProfiler, HistoryEntry, ReviewFrequency, VerificationStatus, NEUTRAL_CREDIBILITY,
};

fn profile(age: u32, count: u32) -> ReviewerProfile {
    ReviewerProfile {
        account_age_days: age,
        review_count: count,
        ..Default::default()
    }
}

fn history(locations: &[&str], sentiments: &[f64], spacing_days: i64) -> Vec<HistoryEntry> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    locations
        .iter()
        .zip(sentiments)
        .enumerate()
        .map(|(i, (loc, s))| HistoryEntry {
            location_id: loc.to_string(),
            timestamp: Some(start + Duration::days(spacing_days * i as i64)),
            sentiment: *s,
        })
        .collect()
}

// ============================================================
// Score formula
// ============================================================

#[test]
fn established_partially_verified_reviewer() {
    let reviewer = ReviewerProfile {
        verified_email: true,
        ..profile(365, 25)
    };
    let score = CredibilityProfiler.score(Some(&reviewer), &[]);
    assert!((score - 0.715).abs() < 0.01, "Expected ~0.715, got {score}");
}

#[test]
fn brand_new_unverified_account_scores_zero() {
    let score = CredibilityProfiler.score(Some(&ReviewerProfile::default()), &[]);
    assert!(score.abs() < 1e-9, "Expected 0, got {score}");
}

#[test]
fn fully_mature_verified_account_scores_one() {
    let reviewer = ReviewerProfile {
        profile_photo: true,
        verified_email: true,
        verified_phone: true,
        ..profile(800, 200)
    };
    let score = CredibilityProfiler.score(Some(&reviewer), &[]);
    assert!((score - 1.0).abs() < 1e-9, "Expected 1.0, got {score}");
}

#[test]
fn absent_reviewer_gets_neutral_score() {
    assert_eq!(CredibilityProfiler.score(None, &[]), NEUTRAL_CREDIBILITY);
}

// ============================================================
// Monotonicity
// ============================================================

#[test]
fn older_accounts_never_score_lower() {
    let mut previous = 0.0;
    for age in [0, 10, 30, 90, 180, 365, 1000] {
        let score = CredibilityProfiler.score(Some(&profile(age, 12)), &[]);
        assert!(score >= previous, "age {age}: {score} < {previous}");
        previous = score;
    }
}

#[test]
fn more_reviews_never_score_lower() {
    let mut previous = 0.0;
    for count in [0, 1, 5, 20, 50, 500, 5000] {
        let score = CredibilityProfiler.score(Some(&profile(200, count)), &[]);
        assert!(score >= previous, "count {count}: {score} < {previous}");
        previous = score;
    }
}

#[test]
fn each_verification_adds_credibility() {
    let mut reviewer = profile(200, 20);
    let base = CredibilityProfiler.score(Some(&reviewer), &[]);
    reviewer.verified_email = true;
    let email = CredibilityProfiler.score(Some(&reviewer), &[]);
    reviewer.verified_phone = true;
    let phone = CredibilityProfiler.score(Some(&reviewer), &[]);
    reviewer.profile_photo = true;
    let photo = CredibilityProfiler.score(Some(&reviewer), &[]);
    assert!(base < email && email < phone && phone < photo);
}

// ============================================================
// History-based descriptors
// ============================================================

#[test]
fn single_review_history_is_not_enough() {
    let h = history(&["a"], &[0.4], 1);
    let result = CredibilityProfiler.profile(&profile(200, 20), &h);
    assert_eq!(result.behavior.sentiment_consistency, None);
    assert_eq!(result.behavior.location_diversity, None);
}

#[test]
fn diverse_steady_history_is_rewarded() {
    let h = history(&["a", "b", "c", "d"], &[0.4, 0.5, 0.45, 0.4], 10);
    let result = CredibilityProfiler.profile(&profile(200, 20), &h);
    let diversity = result.behavior.location_diversity.unwrap();
    let consistency = result.behavior.sentiment_consistency.unwrap();
    assert!((diversity - 1.0).abs() < 1e-9);
    assert!(consistency > 0.8, "Expected > 0.8, got {consistency}");
}

#[test]
fn clustered_history_is_penalized() {
    let locations = ["a"; 6];
    let sentiments = [0.9; 6];
    let clustered = history(&locations, &sentiments, 0);
    let spread = history(&locations, &sentiments, 5);

    let reviewer = profile(200, 20);
    let tight = CredibilityProfiler.profile(&reviewer, &clustered).score;
    let loose = CredibilityProfiler.profile(&reviewer, &spread).score;
    assert!(
        (loose - tight - 0.15).abs() < 1e-9,
        "Expected a 0.15 penalty, got {loose} vs {tight}"
    );
}

#[test]
fn descriptors_report_frequency_and_verification() {
    let reviewer = ReviewerProfile {
        verified_email: true,
        verified_phone: true,
        ..profile(10, 500)
    };
    let result = CredibilityProfiler.profile(&reviewer, &[]);
    assert_eq!(result.behavior.review_frequency, ReviewFrequency::Suspicious);
    assert_eq!(result.verification_status, VerificationStatus::Verified);
    assert!((result.behavior.reviews_per_day - 50.0).abs() < 1e-9);
}
