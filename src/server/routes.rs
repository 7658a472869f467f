//! HTTP surface of the sync server.
//!
//! - `GET  /health`: health check
//! - `GET  /api/reminders`: document and digest
//! - `POST /api/reminders`: conditional push
//! - `GET  /api/poll?hash=..`: long-poll for a digest change
//! - `GET  /api/plan`: parsed plan at server local time

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::service::SyncService;
use super::storage::StoreError;
use crate::digest::Digest;
use crate::models::ParsedPlan;
use crate::protocol::{
    ConflictResponse, ErrorResponse, PollQuery, PollResponse, PushAccepted, PushOutcome,
    PushRequest, Snapshot,
};

/// Builds the router with the service as shared state.
pub fn router(service: Arc<SyncService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/reminders", get(get_reminders).post(post_reminders))
        .route("/api/poll", get(poll))
        .route("/api/plan", get(plan))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Storage(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    e.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_reminders(
    State(service): State<Arc<SyncService>>,
) -> Result<Json<Snapshot>, ApiError> {
    Ok(Json(service.fetch().await?))
}

async fn post_reminders(
    State(service): State<Arc<SyncService>>,
    body: Result<Json<PushRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;

    let response = match service.push(&request.content, request.hash.as_ref()).await? {
        PushOutcome::Accepted { hash } => Json(PushAccepted {
            status: "success".to_string(),
            hash,
        })
        .into_response(),
        PushOutcome::Conflict { current_content } => (
            StatusCode::CONFLICT,
            Json(ConflictResponse { current_content }),
        )
            .into_response(),
    };

    Ok(response)
}

async fn poll(
    State(service): State<Arc<SyncService>>,
    Query(query): Query<PollQuery>,
) -> Result<Json<PollResponse>, ApiError> {
    let client_hash = query.hash.map(Digest::from_client);
    let outcome = service.poll(client_hash.as_ref(), None).await?;
    Ok(Json(outcome.into()))
}

async fn plan(State(service): State<Arc<SyncService>>) -> Result<Json<ParsedPlan>, ApiError> {
    let now = chrono::Local::now().naive_local();
    Ok(Json(service.plan(now).await?))
}
