// GET /api/locations/{id}/dashboard: trust dashboard for one location.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::web::AppState;

use super::blocking;

pub async fn dashboard(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    blocking(state, move |service| service.try_dashboard(&id)).await
}
