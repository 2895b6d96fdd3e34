use axum::Router;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tempfile::TempDir;

use water_footprint::api::{cors_layer, create_router, AppState};
use water_footprint::db::{run_migrations, ReadingRepository};
use water_footprint::ml::{
    CategoryTable, FeatureColumnOrder, ModelArtifact, PredictionContext, PredictionEngine,
};
use water_footprint::ArtifactStore;

pub const TEST_ORIGIN: &str = "https://waterfootprintcalc.netlify.app";

/// One connection that never expires, so the in-memory database survives the test.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// App backed by freshly bootstrapped placeholder artifacts.
pub async fn bootstrapped_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create artifact dir");
    let context = ArtifactStore::new(dir.path())
        .ensure_artifacts()
        .expect("Failed to bootstrap artifacts");
    (app_with_context(context).await, dir)
}

pub async fn app_with_model(model: ModelArtifact) -> Router {
    let context =
        PredictionContext::new(model, FeatureColumnOrder::default(), CategoryTable::default());
    app_with_context(context).await
}

pub async fn app_with_context(context: PredictionContext) -> Router {
    let engine = PredictionEngine::new(Arc::new(context));
    let repository = ReadingRepository::new(memory_pool().await);
    let state = Arc::new(AppState::new(engine, repository));
    create_router(state, cors_layer(TEST_ORIGIN).expect("valid origin"))
}
