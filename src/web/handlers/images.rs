// POST /api/images/verify: image authenticity check.
//
// With the default verifier this always answers 500 "not configured".

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::api::ImageVerifyRequest;
use crate::web::{api_response, AppState};

use super::rejection;

pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<ImageVerifyRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => api_response(state.service.try_verify_image(&request)),
        Err(e) => rejection(e),
    }
}
