// Image verification interface.
//
// Verifying that a photo was really taken at a location needs an external
// vision service. Only the interface lives here; the default verifier
// reports that no backend is configured.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};
use crate::models::LocationContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVerification {
    pub authentic: bool,
    pub confidence: f64,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Checks whether an image plausibly belongs to a location.
pub trait ImageVerifier: Send + Sync {
    /// `image` is the raw (typically base64-encoded) payload from the caller.
    fn verify(&self, image: &str, location: &LocationContext) -> Result<ImageVerification>;
}

/// Verifier used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageVerifier;

impl ImageVerifier for NoopImageVerifier {
    fn verify(&self, image: &str, _location: &LocationContext) -> Result<ImageVerification> {
        if image.trim().is_empty() {
            return Err(TrustError::input("image_data is required"));
        }
        Err(TrustError::internal("image verification is not configured"))
    }
}
