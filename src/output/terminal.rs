// Colored terminal output for trust results, bulk runs, dashboards and
// reviewer profiles.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here unless `--json` is given.

use colored::Colorize;

use crate::aggregate::location::LocationSummary;
use crate::aggregate::reviewer::ReviewerSummary;
use crate::aggregate::ReviewDigest;
use crate::api::BulkAnalysis;
use crate::models::{AnomalyRecord, TrustLabel, TrustScoreResult};

use super::truncate_chars;

/// Display a single review's trust assessment.
pub fn display_trust_result(result: &TrustScoreResult) {
    println!("\n{}", "=== Trust Assessment ===".bold());
    println!(
        "  Trust score: {:.2}  {}",
        result.trust_score,
        colorize_label(result.trust_label)
    );
    println!(
        "  Authenticity: {:.2}  |  Fake probability: {:.2}  |  Credibility: {:.2}  |  Temporal: {:.2}",
        result.authenticity_score,
        result.fake_probability,
        result.reviewer_credibility,
        result.temporal_consistency,
    );

    let sentiment = &result.sentiment_score;
    println!(
        "  Sentiment: {} (polarity {:+.2}, confidence {:.2}, manipulation {:.2})",
        sentiment.category.as_str(),
        sentiment.polarity,
        sentiment.confidence,
        sentiment.manipulation_indicators,
    );

    println!("\n  Contributions:");
    for c in &result.contributions {
        println!(
            "    {:<22} {:>5.2} x {:.2} = {:.3}",
            c.factor.as_str(),
            c.subscore,
            c.weight,
            c.contribution
        );
    }

    let risk = &result.analysis.risk_factors;
    println!(
        "\n  Risk: text {:.2}  behavior {:.2}  age {:.2}  frequency {:.2}  profile {:.2}",
        risk.text_patterns,
        risk.reviewer_behavior,
        risk.account_age_risk,
        risk.review_frequency_risk,
        risk.profile_completeness,
    );
    println!("\n  {}", result.explanation.dimmed());
}

/// Display a bulk run: summary, anomalies, then one line per item.
pub fn display_bulk(analysis: &BulkAnalysis) {
    let summary = &analysis.summary;
    println!(
        "\n{}",
        format!("=== Bulk Analysis ({} reviews) ===", summary.total_reviews).bold()
    );
    println!("  Location trust: {:.2}", analysis.location_trust_score);
    println!(
        "  {} trusted  |  {} suspicious  |  {} failed",
        summary.trusted_reviews.to_string().green(),
        summary.suspicious_reviews.to_string().red(),
        summary.failed_reviews,
    );

    display_anomalies(&analysis.anomalies);

    println!();
    for (i, item) in analysis.individual_results.iter().enumerate() {
        match (&item.data, &item.error) {
            (Some(result), _) => println!(
                "  {:>3}. {:.2}  {}",
                i + 1,
                result.trust_score,
                colorize_label(result.trust_label)
            ),
            (None, Some(error)) => println!("  {:>3}. {}", i + 1, error.red()),
            (None, None) => println!("  {:>3}. ?", i + 1),
        }
    }
}

/// Display a location dashboard.
pub fn display_location(summary: &LocationSummary) {
    let title = if summary.location_name.is_empty() {
        summary.location_id.clone()
    } else {
        format!("{} ({})", summary.location_name, summary.location_id)
    };
    println!("\n{}", format!("=== Trust Dashboard: {title} ===").bold());
    println!(
        "  Overall trust: {:.2}  ({} reviews)",
        summary.overall_trust_score, summary.total_reviews
    );

    let d = &summary.trust_distribution;
    println!(
        "  Distribution: {} high  {} medium  {} low",
        d.high_trust.to_string().green(),
        d.medium_trust.to_string().yellow(),
        d.low_trust.to_string().red(),
    );

    let risk = &summary.risk_factors;
    println!(
        "  Fake review probability: {:.2}  |  Network anomalies: {}  |  Temporal anomalies: {}",
        risk.fake_review_probability, risk.reviewer_network_anomalies, risk.temporal_anomalies
    );

    let active_days: Vec<_> = summary
        .trend_data
        .iter()
        .filter(|p| p.review_count > 0)
        .collect();
    if !active_days.is_empty() {
        println!("\n  Trend ({} active days):", active_days.len());
        for point in active_days {
            println!(
                "    {}  {:.2}  ({} reviews)",
                point.date,
                point.trust_score.unwrap_or(0.0),
                point.review_count
            );
        }
    }

    display_digests("Most trusted", &summary.top_trusted_reviews);
    display_digests("Flagged", &summary.flagged_reviews);
    display_anomalies(&summary.anomalies);
}

/// Display a reviewer's trust profile.
pub fn display_reviewer(summary: &ReviewerSummary) {
    println!(
        "\n{}",
        format!("=== Reviewer {} ===", summary.reviewer_id).bold()
    );
    println!(
        "  Trust score: {:.2}  {}",
        summary.trust_score,
        colorize_label(summary.trust_label)
    );
    println!(
        "  Account age: {} days  |  Reviews: {} ({} analyzed)  |  Verification: {}",
        summary.account_age_days,
        summary.review_count,
        summary.reviews_analyzed,
        summary.verification_status.as_str(),
    );

    let behavior = &summary.behavioral_analysis;
    let network = match behavior.network_analysis {
        crate::aggregate::reviewer::NetworkStatus::Clean => "clean".green().to_string(),
        crate::aggregate::reviewer::NetworkStatus::Flagged => "flagged".red().to_string(),
    };
    println!(
        "  Frequency: {}  |  Network: {}",
        behavior.review_frequency.as_str(),
        network
    );
    if let Some(consistency) = behavior.sentiment_consistency {
        println!("  Sentiment consistency: {consistency:.2}");
    }
    if let Some(diversity) = behavior.location_diversity {
        println!("  Location diversity: {diversity:.2}");
    }

    if !summary.recent_activity.is_empty() {
        println!("\n  Recent activity:");
        for entry in &summary.recent_activity {
            let impact = format!("{:+.2}", entry.trust_impact);
            let impact = if entry.trust_impact >= 0.0 {
                impact.green()
            } else {
                impact.red()
            };
            println!(
                "    {:<12} {:.2}  {}",
                entry.location_id, entry.trust_score, impact
            );
        }
    }
    display_anomalies(&summary.anomalies);
}

fn display_digests(title: &str, digests: &[ReviewDigest]) {
    if digests.is_empty() {
        return;
    }
    println!("\n  {title}:");
    for digest in digests {
        let flags = if digest.flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", digest.flags.join(", "))
        };
        println!(
            "    {:.2}  {}{}",
            digest.trust_score,
            truncate_chars(&digest.text, 60),
            flags.yellow()
        );
    }
}

fn display_anomalies(anomalies: &[AnomalyRecord]) {
    if anomalies.is_empty() {
        return;
    }
    println!("\n  {}", format!("Anomalies ({})", anomalies.len()).bold());
    for anomaly in anomalies {
        let severity = format!("{:.2}", anomaly.severity);
        let severity = if anomaly.severity >= 0.7 {
            severity.red().bold()
        } else if anomaly.severity >= 0.4 {
            severity.yellow()
        } else {
            severity.normal()
        };
        println!(
            "    {}  {:<24} severity {}  {} reviews",
            anomaly.timestamp.format("%Y-%m-%d %H:%M"),
            anomaly.anomaly_type.as_str(),
            severity,
            anomaly.review_count
        );
    }
}

/// Apply color to a trust label.
pub fn colorize_label(label: TrustLabel) -> String {
    match label {
        TrustLabel::HighlyTrusted => label.as_str().green().bold().to_string(),
        TrustLabel::Trusted => label.as_str().green().to_string(),
        TrustLabel::Moderate => label.as_str().yellow().to_string(),
        TrustLabel::LowTrust => label.as_str().bright_red().to_string(),
        TrustLabel::Untrusted => label.as_str().red().bold().to_string(),
    }
}
