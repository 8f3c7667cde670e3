// Web server: Axum JSON API over the trust service.
//
// Every /api/* route returns the same envelope as the library facade:
// `{"success": true, ...payload}` with 200, or `{"success": false, "error"}`
// with 400 for input and validation errors and 500 for internal errors.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{ApiResponse, TrustService};
use crate::error::TrustError;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TrustService>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(service: TrustService, port: u16, bind: &str) -> Result<()> {
    let state = AppState {
        service: Arc::new(service),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Veracity API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/reviews/analyze", post(handlers::reviews::analyze))
        .route("/api/reviews/bulk", post(handlers::reviews::bulk))
        .route(
            "/api/locations/{id}/dashboard",
            get(handlers::locations::dashboard),
        )
        .route("/api/reviewers/{id}", get(handlers::reviewers::profile))
        .route("/api/images/verify", post(handlers::images::verify));

    Router::new()
        .merge(api)
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check. Always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

fn status_for(error: &TrustError) -> StatusCode {
    match error {
        TrustError::Input(_) | TrustError::Validation(_) => StatusCode::BAD_REQUEST,
        TrustError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a service result into an enveloped JSON response.
pub fn api_response<T: Serialize>(result: crate::error::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => api_error(&e),
    }
}

/// Typed JSON error response helper.
pub fn api_error(error: &TrustError) -> Response {
    let status = status_for(error);
    if status.is_server_error() {
        warn!(error = %error, "Request failed");
    }
    (status, Json(ApiResponse::<()>::failure(error))).into_response()
}
