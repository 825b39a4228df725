use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;

use lineup_service::QueueError;

use crate::extract::Caller;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Lineup Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

// ---- Queue operations ----

#[derive(Debug, Deserialize)]
pub struct PatientBody {
    #[serde(rename = "patientRef")]
    pub patient_ref: String,
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub patient: String,
}

pub async fn create_queue(State(state): State<AppState>, Caller(ctx): Caller) -> Response {
    match state.service.create_queue(&ctx).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn current_queue(State(state): State<AppState>, Caller(ctx): Caller) -> Response {
    match state.service.find_current_queue(&ctx).await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no queue has been created" })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn get_queue(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Response {
    match state.service.get_queue(&ctx, &id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn queue_length(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Response {
    match state.service.queue_length(&ctx, &id).await {
        Ok(length) => (StatusCode::OK, Json(json!({ "length": length }))).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn patient_position(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Query(query): Query<PositionQuery>,
) -> Response {
    match state
        .service
        .patient_position(&ctx, &id, &query.patient)
        .await
    {
        Ok(position) => (
            StatusCode::OK,
            Json(json!({ "patientRef": query.patient, "position": position })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn join(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Json(body): Json<PatientBody>,
) -> Response {
    match state.service.join(&ctx, &id, &body.patient_ref).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn leave(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Json(body): Json<PatientBody>,
) -> Response {
    match state.service.leave(&ctx, &id, &body.patient_ref).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn dequeue(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Response {
    match state.service.dequeue_head(&ctx, &id).await {
        Ok(Some((entry, snapshot))) => (
            StatusCode::OK,
            Json(json!({ "entry": entry, "queue": snapshot })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(json!({ "entry": null, "queue": null })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn available_spots(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Response {
    let now = OffsetDateTime::now_utc();
    match state
        .service
        .available_spot_count(
            &ctx,
            &id,
            state.appointment_duration_secs,
            now.weekday(),
            now.time(),
            &state.windows,
        )
        .await
    {
        Ok(spots) => (StatusCode::OK, Json(json!({ "spots": spots }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps the queue error taxonomy onto HTTP statuses. `Contention` is 503:
/// the caller is expected to retry from a fresh read.
fn error_response(err: &QueueError) -> Response {
    let status = match err {
        QueueError::NotFound { .. } => StatusCode::NOT_FOUND,
        QueueError::InvalidId(_) => StatusCode::BAD_REQUEST,
        QueueError::AlreadyInQueue { .. } | QueueError::NotInQueue { .. } => StatusCode::CONFLICT,
        QueueError::Contention { .. } => StatusCode::SERVICE_UNAVAILABLE,
        QueueError::Forbidden(_) => StatusCode::FORBIDDEN,
        QueueError::CorruptDocument { .. } | QueueError::Storage(_) => {
            tracing::error!(error = %err, "queue operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
