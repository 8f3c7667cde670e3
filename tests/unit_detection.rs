// Unit tests for fake review detection: bursts, coordinated networks,
// velocity and sentiment outliers, and order independence.

use chrono::{DateTime, Duration, TimeZone, Utc};
use veracity::detection::{DetectorConfig, FakeReviewDetector};
use veracity::error::TrustError;
use veracity::models::{AnomalyType, Review, ReviewerDirectory, ReviewerProfile};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

fn review(id: &str, reviewer: &str, location: &str, text: &str, at: DateTime<Utc>) -> Review {
    Review {
        id: Some(id.to_string()),
        text: text.to_string(),
        timestamp: Some(at),
        rating: None,
        reviewer_id: reviewer.to_string(),
        location_id: location.to_string(),
    }
}

const VARIED_TEXTS: &[&str] = &[
    "Lovely terrace and quick lunch service",
    "The soup was cold and the bread stale",
    "Parking was a nightmare but the curry made up for it",
    "Our waiter recommended the trout, solid choice",
    "Too loud for a date night, decent wine list",
    "Kids menu is small, pancakes were fine",
    "Booked for eight, seated at nine, no apology",
    "Cheese board was generous and fairly priced",
    "Rainy evening, warm room, friendly host",
    "Burger overcooked, fries great though",
    "Brunch queue moved fast on a Sunday",
    "Vegan options labelled clearly on the menu",
    "The dessert cart is worth the visit alone",
    "Coffee tasted burnt, croissant was flaky",
    "Anniversary dinner, they brought a candle",
    "Noodles arrived lukewarm after thirty minutes",
    "Table by the window had a draft all evening",
    "Chef came out to say hello, nice touch",
];

fn detect(reviews: &[Review]) -> veracity::detection::Detection {
    FakeReviewDetector::default()
        .detect(reviews, &ReviewerDirectory::new())
        .unwrap()
}

// ============================================================
// Review bombing
// ============================================================

#[test]
fn fifteen_reviews_in_two_hours_is_a_burst() {
    let reviews: Vec<Review> = (0..15)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                VARIED_TEXTS[i],
                start() + Duration::minutes(8 * i as i64),
            )
        })
        .collect();

    let detection = detect(&reviews);
    let burst = detection
        .anomalies
        .iter()
        .find(|a| a.anomaly_type == AnomalyType::ReviewBombing)
        .expect("burst should be detected");

    assert_eq!(burst.review_count, 15);
    assert_eq!(burst.reviewer_ids.len(), 15);
    assert_eq!(burst.location_ids, vec!["loc-1".to_string()]);
    // threshold 3 (baseline floor) against 15 reviews
    assert!((burst.severity - 0.8).abs() < 1e-9, "Expected ~0.8, got {}", burst.severity);
    for i in 0..15 {
        assert!(detection.max_severity(i).is_some());
    }
}

#[test]
fn burst_is_measured_against_trailing_average() {
    let mut reviews = Vec::new();
    for day in 0..7 {
        reviews.push(review(
            &format!("d{day}"),
            &format!("regular-{day}"),
            "loc-1",
            VARIED_TEXTS[day],
            start() + Duration::days(day as i64),
        ));
    }
    for i in 0..5 {
        reviews.push(review(
            &format!("b{i}"),
            &format!("burst-{i}"),
            "loc-1",
            VARIED_TEXTS[7 + i],
            start() + Duration::days(7) + Duration::minutes(5 * i as i64),
        ));
    }

    let detection = detect(&reviews);
    let bursts: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::ReviewBombing)
        .collect();
    assert_eq!(bursts.len(), 1);
    // trailing average 1/day -> threshold 3 -> 1 - 3/5
    assert!((bursts[0].severity - 0.4).abs() < 1e-9, "got {}", bursts[0].severity);
    assert_eq!(bursts[0].review_count, 5);
}

#[test]
fn burst_across_midnight_is_reported_once() {
    let late = Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
    let reviews: Vec<Review> = (0..15)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                VARIED_TEXTS[i],
                late + Duration::minutes(8 * i as i64),
            )
        })
        .collect();

    let detection = detect(&reviews);
    let bursts: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::ReviewBombing)
        .collect();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].review_count, 15);
    assert!((bursts[0].severity - 0.8).abs() < 1e-9, "got {}", bursts[0].severity);
    assert_eq!(bursts[0].timestamp, late);
    for i in 0..15 {
        assert!(detection.max_severity(i).is_some(), "review {i} missed");
    }
}

#[test]
fn sustained_burst_spanning_two_days_is_one_anomaly() {
    let reviews: Vec<Review> = (0..20)
        .map(|i| {
            let at = start() + Duration::days((i / 10) as i64) + Duration::hours((i % 10) as i64);
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                VARIED_TEXTS[i % VARIED_TEXTS.len()],
                at,
            )
        })
        .collect();

    let detection = detect(&reviews);
    let bursts: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::ReviewBombing)
        .collect();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].review_count, 20);
    // threshold 3 against 20 reviews
    assert!((bursts[0].severity - 0.85).abs() < 1e-9, "got {}", bursts[0].severity);
}

#[test]
fn uptick_over_busy_baseline_is_not_a_burst() {
    let mut reviews = Vec::new();
    let mut n = 0;
    for day in 0..7 {
        for k in 0..4 {
            reviews.push(review(
                &format!("r{n}"),
                &format!("user-{n}"),
                "loc-1",
                VARIED_TEXTS[n % VARIED_TEXTS.len()],
                start() + Duration::days(day) + Duration::hours(2 * k),
            ));
            n += 1;
        }
    }
    for k in 0..8 {
        reviews.push(review(
            &format!("r{n}"),
            &format!("user-{n}"),
            "loc-1",
            VARIED_TEXTS[n % VARIED_TEXTS.len()],
            start() + Duration::days(7) + Duration::hours(k),
        ));
        n += 1;
    }

    let detection = detect(&reviews);
    assert!(detection
        .anomalies
        .iter()
        .all(|a| a.anomaly_type != AnomalyType::ReviewBombing));
}

#[test]
fn bursts_are_counted_per_location() {
    // 3 reviews each at two locations in the same hour: neither reaches the minimum size
    let reviews: Vec<Review> = (0..6)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                if i % 2 == 0 { "loc-a" } else { "loc-b" },
                VARIED_TEXTS[i],
                start() + Duration::minutes(i as i64),
            )
        })
        .collect();
    let detection = detect(&reviews);
    assert!(detection
        .anomalies
        .iter()
        .all(|a| a.anomaly_type != AnomalyType::ReviewBombing));
}

// ============================================================
// Coordinated networks
// ============================================================

#[test]
fn duplicate_texts_from_distinct_reviewers_form_a_network() {
    let text = "Best tacos in town, friendly staff and quick service";
    let reviews: Vec<Review> = (0..4)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                text,
                start() + Duration::minutes(10 * i as i64),
            )
        })
        .collect();

    let detection = detect(&reviews);
    let network: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::CoordinatedNetwork)
        .collect();
    assert_eq!(network.len(), 1);
    assert_eq!(network[0].review_count, 4);
    // 0.5 * (4 / 10) + 0.5 * 1.0
    assert!((network[0].severity - 0.7).abs() < 1e-9, "got {}", network[0].severity);
}

#[test]
fn same_reviewer_repeating_itself_is_not_a_network() {
    let text = "Best tacos in town, friendly staff and quick service";
    let reviews: Vec<Review> = (0..4)
        .map(|i| {
            review(
                &format!("r{i}"),
                "user-1",
                "loc-1",
                text,
                start() + Duration::minutes(10 * i as i64),
            )
        })
        .collect();
    let detection = detect(&reviews);
    assert!(detection
        .anomalies
        .iter()
        .all(|a| a.anomaly_type != AnomalyType::CoordinatedNetwork));
}

#[test]
fn duplicates_outside_the_window_are_not_linked() {
    let text = "Best tacos in town, friendly staff and quick service";
    let reviews: Vec<Review> = (0..4)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                text,
                start() + Duration::hours(3 * i as i64),
            )
        })
        .collect();
    let detection = detect(&reviews);
    assert!(detection
        .anomalies
        .iter()
        .all(|a| a.anomaly_type != AnomalyType::CoordinatedNetwork));
}

#[test]
fn matching_ratings_at_two_locations_link_reviewers() {
    let mut reviews = Vec::new();
    for (day, location) in [(0, "loc-a"), (3, "loc-b")] {
        for i in 0..3 {
            let mut r = review(
                &format!("{location}-{i}"),
                &format!("user-{i}"),
                location,
                VARIED_TEXTS[day as usize + i],
                start() + Duration::days(day) + Duration::minutes(15 * i as i64),
            );
            r.rating = Some(5);
            reviews.push(r);
        }
    }

    let detection = detect(&reviews);
    let network: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::CoordinatedNetwork)
        .collect();
    assert_eq!(network.len(), 2);
    for cluster in network {
        assert_eq!(cluster.reviewer_ids.len(), 3);
        assert!(cluster.severity >= 0.45 - 1e-9, "got {}", cluster.severity);
    }
}

// ============================================================
// Outliers
// ============================================================

#[test]
fn hyperactive_reviewer_is_a_velocity_outlier() {
    let mut directory = ReviewerDirectory::new();
    let mut reviews = Vec::new();
    for i in 0..10 {
        let id = format!("user-{i}");
        let profile = if i == 7 {
            ReviewerProfile {
                account_age_days: 10,
                review_count: 500,
                ..Default::default()
            }
        } else {
            ReviewerProfile {
                account_age_days: 100,
                review_count: 10,
                ..Default::default()
            }
        };
        directory.insert(id.clone(), profile);
        reviews.push(review(
            &format!("r{i}"),
            &id,
            "loc-1",
            VARIED_TEXTS[i],
            start() + Duration::days(i as i64),
        ));
    }

    let detection = FakeReviewDetector::default()
        .detect(&reviews, &directory)
        .unwrap();
    let outliers: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::TemporalIrregularity)
        .collect();
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].reviewer_ids, vec!["user-7".to_string()]);
    // median 0.1, MAD 0 -> mean absolute deviation scale, z ~ 8
    assert!((outliers[0].severity - 1.0).abs() < 1e-6, "got {}", outliers[0].severity);
    assert!(detection.max_severity(7).is_some());
    assert!(detection.max_severity(0).is_none());
}

fn velocity_outliers(rates: &[(u32, u32)]) -> Vec<String> {
    let mut directory = ReviewerDirectory::new();
    let mut reviews = Vec::new();
    for (i, &(age, count)) in rates.iter().enumerate() {
        let id = format!("user-{i}");
        directory.insert(
            id.clone(),
            ReviewerProfile {
                account_age_days: age,
                review_count: count,
                ..Default::default()
            },
        );
        reviews.push(review(
            &format!("r{i}"),
            &id,
            "loc-1",
            VARIED_TEXTS[i],
            start() + Duration::days(i as i64),
        ));
    }
    FakeReviewDetector::default()
        .detect(&reviews, &directory)
        .unwrap()
        .anomalies
        .into_iter()
        .filter(|a| a.anomaly_type == AnomalyType::TemporalIrregularity)
        .flat_map(|a| a.reviewer_ids)
        .collect()
}

#[test]
fn outlier_is_found_at_the_minimum_population() {
    let flagged = velocity_outliers(&[(100, 10), (100, 10), (10, 10_000), (100, 10), (100, 10)]);
    assert_eq!(flagged, vec!["user-2".to_string()]);
}

#[test]
fn evenly_spread_population_has_no_outliers() {
    // 0.04 to 0.12 reviews per day
    let flagged = velocity_outliers(&[(100, 4), (100, 6), (100, 8), (100, 10), (100, 12)]);
    assert!(flagged.is_empty(), "got {flagged:?}");
}

#[test]
fn small_populations_report_no_outliers() {
    let mut directory = ReviewerDirectory::new();
    let mut reviews = Vec::new();
    for i in 0..3 {
        let id = format!("user-{i}");
        directory.insert(
            id.clone(),
            ReviewerProfile {
                account_age_days: 10,
                review_count: if i == 0 { 1000 } else { 1 },
                ..Default::default()
            },
        );
        reviews.push(review(
            &format!("r{i}"),
            &id,
            "loc-1",
            VARIED_TEXTS[i],
            start() + Duration::days(i as i64),
        ));
    }
    let detection = FakeReviewDetector::default()
        .detect(&reviews, &directory)
        .unwrap();
    assert!(detection.anomalies.is_empty());
}

#[test]
fn uniformly_glowing_reviewer_is_flagged() {
    let mut reviews = Vec::new();
    let mut sentiments = Vec::new();
    let mut n = 0;
    for reviewer in 0..6 {
        let scores = if reviewer == 5 {
            [0.9, 0.9, 0.9]
        } else {
            [0.5, -0.3, 0.1]
        };
        for score in scores {
            reviews.push(review(
                &format!("r{n}"),
                &format!("user-{reviewer}"),
                "loc-1",
                VARIED_TEXTS[n],
                start() + Duration::days(n as i64),
            ));
            sentiments.push(score);
            n += 1;
        }
    }

    let refs: Vec<&Review> = reviews.iter().collect();
    let detection = FakeReviewDetector::default()
        .detect_with_sentiment(&refs, &sentiments, &ReviewerDirectory::new())
        .unwrap();
    let flagged: Vec<_> = detection
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::SentimentManipulation)
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].reviewer_ids, vec!["user-5".to_string()]);
    assert_eq!(flagged[0].review_count, 3);
}

// ============================================================
// Determinism and input validation
// ============================================================

fn mixed_batch() -> Vec<Review> {
    let text = "Best tacos in town, friendly staff and quick service";
    let mut reviews: Vec<Review> = (0..15)
        .map(|i| {
            review(
                &format!("b{i}"),
                &format!("user-{i}"),
                "loc-1",
                if i < 5 { text } else { VARIED_TEXTS[i] },
                start() + Duration::minutes(8 * i as i64),
            )
        })
        .collect();
    reviews.extend((0..3).map(|i| {
        review(
            &format!("q{i}"),
            &format!("quiet-{i}"),
            "loc-2",
            VARIED_TEXTS[i],
            start() + Duration::days(2 + i as i64),
        )
    }));
    reviews
}

#[test]
fn input_order_does_not_change_anomalies() {
    let forward = mixed_batch();
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = detect(&forward);
    let b = detect(&reversed);
    assert!(!a.anomalies.is_empty());
    assert_eq!(a.anomalies, b.anomalies);
    assert!((a.fake_probability - b.fake_probability).abs() < 1e-12);
}

#[test]
fn repeated_detection_is_identical() {
    let batch = mixed_batch();
    let a = detect(&batch);
    let b = detect(&batch);
    assert_eq!(a.anomalies, b.anomalies);
    assert_eq!(a.memberships, b.memberships);
}

#[test]
fn batch_without_timestamp_is_rejected() {
    let mut batch = mixed_batch();
    batch[3].timestamp = None;
    let result = FakeReviewDetector::default().detect(&batch, &ReviewerDirectory::new());
    match result {
        Err(TrustError::Input(message)) => assert!(message.contains("b3"), "got {message}"),
        other => panic!("expected input error, got {other:?}"),
    }
}

#[test]
fn tighter_window_finds_fewer_links() {
    let text = "Best tacos in town, friendly staff and quick service";
    let reviews: Vec<Review> = (0..4)
        .map(|i| {
            review(
                &format!("r{i}"),
                &format!("user-{i}"),
                "loc-1",
                text,
                start() + Duration::minutes(20 * i as i64),
            )
        })
        .collect();
    let detector = FakeReviewDetector::new(DetectorConfig {
        coordination_window: Duration::minutes(10),
        ..DetectorConfig::default()
    });
    let detection = detector.detect(&reviews, &ReviewerDirectory::new()).unwrap();
    assert!(detection.anomalies.is_empty());
}
