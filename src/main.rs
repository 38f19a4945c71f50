use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use lexicon_trainer::{
    config::AppConfig,
    data::repositories::{CatalogRepository, TrainingRepository},
    db,
    features::training::TrainingInteractor,
    handlers::training_router,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;

    // Database
    let pool = db::build_pool(&cfg.database_url, cfg.db_pool_size)?;
    db::run_migrations(&pool)?;

    // Training engine wired to the SQLite catalog and registry
    let catalog = Arc::new(CatalogRepository::new(pool.clone()));
    let registry = Arc::new(TrainingRepository::new(pool));
    let interactor = Arc::new(TrainingInteractor::new(
        registry,
        catalog.clone(),
        catalog,
    ));

    let app = training_router(interactor).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cfg.bind_addr))?;

    log::info!("Server running on http://{}", cfg.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
