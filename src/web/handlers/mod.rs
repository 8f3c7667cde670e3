// Route handlers, one module per resource.

pub mod images;
pub mod locations;
pub mod reviewers;
pub mod reviews;

use axum::extract::rejection::JsonRejection;
use axum::response::Response;

use crate::error::{Result, TrustError};
use crate::web::{api_error, api_response, AppState};
use serde::Serialize;

/// Malformed JSON bodies get the same envelope as any other input error.
pub(crate) fn rejection(rejection: JsonRejection) -> Response {
    api_error(&TrustError::input(rejection.body_text()))
}

/// Run a CPU-bound service call off the async runtime.
pub(crate) async fn blocking<T, F>(state: AppState, work: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&crate::api::TrustService) -> Result<T> + Send + 'static,
{
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || work(&service)).await {
        Ok(result) => api_response(result),
        Err(e) => api_error(&TrustError::internal(format!("scoring task failed: {e}"))),
    }
}
