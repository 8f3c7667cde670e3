// GET /api/reviewers/{id}: reviewer trust profile.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::web::AppState;

use super::blocking;

pub async fn profile(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    blocking(state, move |service| service.try_reviewer_profile(&id)).await
}
