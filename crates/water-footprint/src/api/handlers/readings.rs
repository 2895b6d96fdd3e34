use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::error::{Result, WaterError};
use crate::models::{CreateReading, Reading, ReadingCreated, ReadingQuery};

/// Store a new reading
#[utoipa::path(
    post,
    path = "/readings",
    request_body = CreateReading,
    responses(
        (status = 201, description = "Reading saved", body = ReadingCreated),
        (status = 400, description = "Invalid reading")
    )
)]
pub async fn create_reading(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateReading>, JsonRejection>,
) -> Result<(StatusCode, Json<ReadingCreated>)> {
    let Json(payload) = payload?;
    payload.validate()?;
    let reading = state.repository.create(&payload).await?;

    tracing::info!(id = reading.id, device_id = %reading.device_id, "reading saved");

    Ok((StatusCode::CREATED, Json(ReadingCreated::saved(reading.id))))
}

/// List the most recent readings, newest first
#[utoipa::path(
    get,
    path = "/readings",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum readings to return (default: 50)")
    ),
    responses(
        (status = 200, description = "Recent readings", body = [Reading]),
        (status = 400, description = "Limit out of range")
    )
)]
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ReadingQuery>, QueryRejection>,
) -> Result<Json<Vec<Reading>>> {
    let Query(query) = query?;
    let limit = query.resolve_limit(state.readings_default_limit)?;
    let readings = state.repository.list_recent(limit).await?;
    Ok(Json(readings))
}

/// Fetch a single reading
#[utoipa::path(
    get,
    path = "/readings/{id}",
    params(
        ("id" = i64, Path, description = "Reading id")
    ),
    responses(
        (status = 200, description = "Reading found", body = Reading),
        (status = 404, description = "Reading not found")
    )
)]
pub async fn get_reading(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Reading>> {
    let Path(id) = id?;
    let reading = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| WaterError::not_found("reading", id.to_string()))?;

    Ok(Json(reading))
}
