// Loosely-typed request payloads and their conversion into engine models.
//
// Callers send numbers as plain JSON integers, so counts arrive as i64 and
// are range-checked here. Anything out of range is a ValidationError.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};
use crate::models::{LocationContext, Review, ReviewerProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReviewerData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_age_days: Option<i64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub profile_photo: bool,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub verified_phone: bool,
    #[serde(default)]
    pub bio: Option<String>,
}

fn non_negative(field: &str, value: Option<i64>) -> Result<u32> {
    let value = value.unwrap_or(0);
    u32::try_from(value)
        .map_err(|_| TrustError::validation(format!("{field} must be a non-negative count, got {value}")))
}

impl TryFrom<&RawReviewerData> for ReviewerProfile {
    type Error = TrustError;

    fn try_from(raw: &RawReviewerData) -> Result<Self> {
        Ok(ReviewerProfile {
            account_age_days: non_negative("account_age_days", raw.account_age_days)?,
            review_count: non_negative("review_count", raw.review_count)?,
            profile_photo: raw.profile_photo,
            verified_email: raw.verified_email,
            verified_phone: raw.verified_phone,
            bio: raw.bio.clone(),
        })
    }
}

/// Ratings outside 1-5 are rejected.
pub fn parse_rating(rating: Option<i64>) -> Result<Option<u8>> {
    match rating {
        None => Ok(None),
        Some(r @ 1..=5) => Ok(Some(r as u8)),
        Some(r) => Err(TrustError::validation(format!(
            "rating must be between 1 and 5, got {r}"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeReviewRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reviewer_data: Option<RawReviewerData>,
    #[serde(default)]
    pub location_data: Option<LocationContext>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AnalyzeReviewRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Convert into a review and its reviewer. Missing reviewer data means
    /// an empty profile: a brand-new, unverified account.
    pub fn to_review(&self) -> Result<(Review, ReviewerProfile)> {
        let profile = match &self.reviewer_data {
            Some(raw) => ReviewerProfile::try_from(raw)?,
            None => ReviewerProfile::default(),
        };
        let review = Review {
            id: self.id.clone(),
            text: self.text.clone(),
            timestamp: self.timestamp,
            rating: parse_rating(self.rating)?,
            reviewer_id: self
                .reviewer_data
                .as_ref()
                .and_then(|r| r.id.clone())
                .unwrap_or_default(),
            location_id: self
                .location_data
                .as_ref()
                .map(|l| l.id.clone())
                .unwrap_or_default(),
        };
        Ok((review, profile))
    }
}

/// One entry of a bulk request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkReviewItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reviewer_id: Option<String>,
    #[serde(default)]
    pub reviewer_data: Option<RawReviewerData>,
    #[serde(default)]
    pub location_data: Option<LocationContext>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BulkReviewItem {
    /// Convert into a review and its reviewer. Items without any reviewer
    /// identity get a per-item anonymous id so they never look like one
    /// reviewer posting repeatedly.
    pub fn to_review(&self, position: usize) -> Result<(Review, ReviewerProfile)> {
        let single = AnalyzeReviewRequest {
            id: self.id.clone(),
            text: self.text.clone(),
            reviewer_data: self.reviewer_data.clone(),
            location_data: self.location_data.clone(),
            rating: self.rating,
            timestamp: self.timestamp,
        };
        let (mut review, profile) = single.to_review()?;
        if review.reviewer_id.is_empty() {
            review.reviewer_id = self
                .reviewer_id
                .clone()
                .unwrap_or_else(|| format!("anonymous-{position}"));
        }
        Ok((review, profile))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkReviewRequest {
    pub reviews: Vec<BulkReviewItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageVerifyRequest {
    #[serde(default)]
    pub image_data: String,
    #[serde(default)]
    pub location_data: LocationContext,
}
