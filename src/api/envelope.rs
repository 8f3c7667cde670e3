// Response envelope: `{"success": true, ...payload}` or
// `{"success": false, "error": "..."}`.

use serde::Serialize;
use tracing::warn;

use crate::error::{Result, TrustError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload fields are flattened into the envelope
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: &TrustError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// Wrap an engine result. Failures are logged here, at the boundary.
    pub fn from_result(result: Result<T>, operation: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                warn!(operation, error = %e, "Request failed");
                Self::failure(&e)
            }
        }
    }
}
