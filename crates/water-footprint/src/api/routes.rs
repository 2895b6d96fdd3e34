use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers;
use super::state::AppState;
use crate::error::{Result, WaterError};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::predict,
        handlers::create_reading,
        handlers::list_readings,
        handlers::get_reading,
    ),
    components(schemas(
        crate::models::PredictRequest,
        crate::models::PredictResponse,
        crate::models::Reading,
        crate::models::CreateReading,
        crate::models::ReadingCreated,
    )),
    tags(
        (name = "water-footprint", description = "Water usage readings and savings prediction API")
    ),
    info(
        title = "Water Footprint API",
        version = "0.1.0",
        description = "Records water usage readings and predicts savings from water-saving devices"
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Credentialed CORS for a single origin; methods and headers mirror the request.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| WaterError::config(format!("Invalid CORS origin '{}': {}", allowed_origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route(
            "/readings",
            post(handlers::create_reading).get(handlers::list_readings),
        )
        .route("/readings/:id", get(handlers::get_reading))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
