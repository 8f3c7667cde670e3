// Review dataset: the in-memory store behind dashboard and reviewer lookups.
//
// Loaded once from a JSON file at startup and never modified afterwards:
//
// {
//   "locations": [{"id": "loc-1", "name": "Cafe Rio"}],
//   "reviewers": {"rev-1": {"account_age_days": 400, "review_count": 12}},
//   "reviews":   [{"id": "r1", "text": "...", "timestamp": "2024-05-01T12:00:00Z",
//                  "rating": 5, "reviewer_id": "rev-1", "location_id": "loc-1"}]
// }

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{LocationContext, Review, ReviewerDirectory, ReviewerProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewDataset {
    #[serde(default)]
    pub locations: Vec<LocationContext>,
    #[serde(default)]
    pub reviewers: ReviewerDirectory,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl ReviewDataset {
    /// Load a dataset file. A missing file is an error; use
    /// `ReviewDataset::default()` to start empty.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        info!(
            path = %path.display(),
            locations = dataset.locations.len(),
            reviewers = dataset.reviewers.len(),
            reviews = dataset.reviews.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn location(&self, id: &str) -> Option<&LocationContext> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn reviewer(&self, id: &str) -> Option<&ReviewerProfile> {
        self.reviewers.get(id)
    }

    /// Whether anything in the dataset mentions this location.
    pub fn knows_location(&self, id: &str) -> bool {
        self.location(id).is_some() || self.reviews.iter().any(|r| r.location_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_dataset() {
        let raw = r#"{
            "locations": [{"id": "loc-1", "name": "Cafe Rio"}],
            "reviewers": {"rev-1": {"account_age_days": 400, "review_count": 12}},
            "reviews": [{"text": "Solid tacos", "timestamp": "2024-05-01T12:00:00Z",
                         "rating": 4, "reviewer_id": "rev-1", "location_id": "loc-1"}]
        }"#;
        let dataset: ReviewDataset = serde_json::from_str(raw).unwrap();
        assert_eq!(dataset.location("loc-1").map(|l| l.name.as_str()), Some("Cafe Rio"));
        assert_eq!(dataset.reviewer("rev-1").map(|r| r.review_count), Some(12));
        assert!(dataset.knows_location("loc-1"));
        assert!(!dataset.knows_location("loc-2"));
    }
}
