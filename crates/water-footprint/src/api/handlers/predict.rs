use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::error::Result;
use crate::models::{PredictRequest, PredictResponse};

/// Predict water usage and the savings attributable to a water-saving device
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction computed", body = PredictResponse),
        (status = 400, description = "Invalid household parameters")
    )
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    request: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(request) = request?;
    request.validate()?;

    let result = state.engine.predict_with_savings(&request.to_inputs())?;
    if !result.primary_appliance_recognized {
        tracing::info!(
            primary_appliance = %request.primary_appliance,
            "prediction used fallback appliance code"
        );
    }

    Ok(Json(result.into()))
}
