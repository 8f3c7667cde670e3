// Review scoring handlers.
//
// POST /api/reviews/analyze: one review
// POST /api/reviews/bulk:    {"reviews": [...]}, up to the configured maximum

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::api::{AnalyzeReviewRequest, BulkReviewRequest};
use crate::web::AppState;

use super::{blocking, rejection};

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => return rejection(e),
    };
    blocking(state, move |service| service.try_analyze_review(&request)).await
}

pub async fn bulk(
    State(state): State<AppState>,
    body: Result<Json<BulkReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => return rejection(e),
    };
    blocking(state, move |service| service.try_analyze_bulk(&request.reviews)).await
}
