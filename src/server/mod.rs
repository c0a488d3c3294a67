//! Read-only HTTP query surface over the notice store
//!
//! The API never mutates anything; ingestion happens on the scheduler's
//! cadence regardless of traffic here.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::StoredNotice;
use crate::storage::NoticeStore;

/// Query parameters for `/notices/latest`
#[derive(Debug, Deserialize)]
struct LatestParams {
    limit: Option<usize>,
}

/// Query parameters for `/notices`
#[derive(Debug, Deserialize)]
struct SinceParams {
    since: String,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    notices: usize,
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Build the API router
pub fn router(store: Arc<NoticeStore>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/notices/latest", get(latest_handler))
        .route("/notices", get(since_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(store)
}

/// Root handler - service banner
async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "suchna notice API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "latest": "GET /notices/latest?limit=N",
            "since": "GET /notices?since=YYYY-MM-DD"
        }
    }))
}

/// Health check handler
async fn health_handler(
    State(store): State<Arc<NoticeStore>>,
) -> Result<Json<HealthResponse>, HandlerError> {
    let notices = store.count().map_err(internal_error)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        notices,
    }))
}

/// Most recent N notices, newest first
async fn latest_handler(
    State(store): State<Arc<NoticeStore>>,
    Query(params): Query<LatestParams>,
) -> Result<Json<Vec<StoredNotice>>, HandlerError> {
    let limit = params.limit.unwrap_or(10);
    let notices = store.latest(limit).map_err(internal_error)?;
    Ok(Json(notices))
}

/// Notices with date at or after the given ISO date, newest first
async fn since_handler(
    State(store): State<Arc<NoticeStore>>,
    Query(params): Query<SinceParams>,
) -> Result<Json<Vec<StoredNotice>>, HandlerError> {
    let since = NaiveDate::parse_from_str(&params.since, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("since must be an ISO date (YYYY-MM-DD): {}", params.since),
            }),
        )
    })?;

    let notices = store.since(since).map_err(internal_error)?;
    Ok(Json(notices))
}

fn internal_error(err: anyhow::Error) -> HandlerError {
    tracing::error!(error = %err, "notice query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to fetch notices".to_string(),
        }),
    )
}
