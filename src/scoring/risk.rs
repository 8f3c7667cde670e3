// Risk factors: named indicators surfaced in a trust result's analysis.
//
// Text-derived risk is always computed. The reviewer-derived indicators are
// 0.0 when no profile accompanies the review; an absent reviewer is not
// evidence either way.

use crate::models::{clamp01, ReviewerProfile, RiskFactors};
use crate::text::features::TextFeatures;
use crate::text::lexicon::lexicon;

/// Review frequency used when the profile has no age or no reviews.
const UNKNOWN_FREQUENCY_RISK: f64 = 0.5;

/// Assess every risk indicator for one review.
pub fn assess(features: &TextFeatures, reviewer: Option<&ReviewerProfile>) -> RiskFactors {
    let text_patterns = text_pattern_risk(features);
    match reviewer {
        Some(profile) => RiskFactors {
            text_patterns,
            reviewer_behavior: reviewer_behavior_risk(profile),
            account_age_risk: account_age_risk(profile.account_age_days),
            review_frequency_risk: review_frequency_risk(profile),
            profile_completeness: profile_incompleteness(profile),
        },
        None => RiskFactors {
            text_patterns,
            ..RiskFactors::default()
        },
    }
}

/// Suspicious phrasing, bot-like text and keyword stuffing.
pub fn text_pattern_risk(features: &TextFeatures) -> f64 {
    if features.is_empty() {
        return 1.0;
    }
    let lex = lexicon();
    let text = features.tokens.join(" ");
    let mut risk = 0.0;

    risk += 0.2
        * lex
            .suspicious_patterns
            .iter()
            .filter(|p| p.is_match(&text))
            .count() as f64;

    // Bot indicators
    if features.char_count <= 20 {
        risk += 0.25;
    }
    if features.longest_char_run >= 4 {
        risk += 0.25;
    }
    if features.longest_repeat_run >= 2 {
        risk += 0.25;
    }

    if features.word_count < 3 {
        risk += 0.35;
    } else if features.word_count > 500 {
        risk += 0.1;
    }

    if features.generic_phrase_count > 2 {
        risk += 0.25;
    }
    if features.superlative_density() > 0.15 {
        risk += 0.25;
    }
    risk += 0.2 * features.template_similarity;

    clamp01(risk)
}

/// Young accounts with high volume, hyperactive posting, nothing verified.
pub fn reviewer_behavior_risk(profile: &ReviewerProfile) -> f64 {
    let age = profile.account_age_days;
    let count = profile.review_count;
    let mut risk = 0.0;

    if age < 30 {
        risk += 0.1;
        if count > 20 {
            risk += 0.4;
        }
    } else if age < 90 && count > 50 {
        risk += 0.3;
    }

    if count > 0 && profile.reviews_per_day() > 2.0 {
        risk += 0.3;
    }

    let verified = [profile.profile_photo, profile.verified_email, profile.verified_phone]
        .iter()
        .filter(|v| **v)
        .count();
    risk += match verified {
        0 => 0.3,
        1 => 0.1,
        _ => 0.0,
    };

    clamp01(risk)
}

pub fn account_age_risk(account_age_days: u32) -> f64 {
    match account_age_days {
        0..=6 => 0.9,
        7..=29 => 0.6,
        30..=89 => 0.3,
        _ => 0.1,
    }
}

pub fn review_frequency_risk(profile: &ReviewerProfile) -> f64 {
    if profile.review_count == 0 || profile.account_age_days == 0 {
        return UNKNOWN_FREQUENCY_RISK;
    }
    let rate = profile.reviews_per_day();
    if rate > 5.0 {
        0.9
    } else if rate > 2.0 {
        0.6
    } else if rate > 1.0 {
        0.3
    } else {
        0.1
    }
}

/// Share of {photo, email, phone, bio} that is missing.
pub fn profile_incompleteness(profile: &ReviewerProfile) -> f64 {
    let present = [
        profile.profile_photo,
        profile.verified_email,
        profile.verified_phone,
        profile.has_bio(),
    ]
    .iter()
    .filter(|v| **v)
    .count();
    1.0 - present as f64 / 4.0
}
