use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use water_footprint::{
    api::{cors_layer, create_router, AppState},
    config::Config,
    db::{create_pool, run_migrations, ReadingRepository},
    ArtifactStore, PredictionEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "water_footprint=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        listen_addr = %config.server_address(),
        artifact_dir = %config.model.artifact_dir.display(),
        "Starting water-footprint service"
    );

    // Artifacts must be in place before any request is served.
    let context = ArtifactStore::new(&config.model.artifact_dir).ensure_artifacts()?;
    let engine = PredictionEngine::new(Arc::new(context));

    tracing::info!(database_url = %config.database.url, "Connecting to database");
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let state = Arc::new(
        AppState::new(engine, ReadingRepository::new(pool))
            .with_readings_default_limit(config.server.readings_default_limit),
    );
    let app = create_router(state, cors_layer(&config.server.cors_allowed_origin)?);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Water footprint service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
