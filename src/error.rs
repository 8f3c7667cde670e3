// Engine error taxonomy.
//
// Every analyzer returns `TrustError`; the API facade converts it into the
// `{success: false, error}` envelope and the HTTP layer maps the kind to a
// status code. Binary-level plumbing (config, dataset files) uses anyhow.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, TrustError>;

/// Errors raised while scoring reviews.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrustError {
    /// A required field is missing or malformed (e.g. no timestamp for
    /// temporal detection).
    #[error("input error: {0}")]
    Input(String),

    /// A field is present but out of range (e.g. negative account age).
    #[error("validation error: {0}")]
    Validation(String),

    /// A sub-analyzer failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrustError {
    pub fn input(message: impl Into<String>) -> Self {
        TrustError::Input(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TrustError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        TrustError::Internal(message.into())
    }

    /// True for errors caused by the caller's data rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TrustError::Input(_) | TrustError::Validation(_))
    }
}
