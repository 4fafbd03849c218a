use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use carsearch_core::config::{AppSettings, Config};
use carsearch_core::generator::CarGenerator;
use carsearch_index::TantivyCarIndex;
use carsearch_server::{serve, AppState};
use carsearch_service::{Bootstrap, CarQueryService, Readiness};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = AppSettings::load(&config)?;

    let base = env::current_dir()?;
    let heap = settings.index.writer_heap_bytes;
    let index = match settings.index.resolved_dir(&base) {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "opening car index");
            TantivyCarIndex::open_or_create(&dir, heap)?
        }
        None => {
            tracing::info!(name = %settings.index.name, "using in-memory car index");
            TantivyCarIndex::create_in_ram(heap)?
        }
    };
    let index = Arc::new(index);

    let readiness = Readiness::new();
    let report = Bootstrap::new(Arc::clone(&index), settings.bootstrap.clone(), readiness.clone())
        .run(&mut CarGenerator::from_entropy())
        .await
        .context("bootstrap could not reset the car index")?;
    tracing::info!(attempts = report.attempts, indexed = report.indexed, "bootstrap finished");

    let state = AppState::new(CarQueryService::new(index), readiness);
    serve(state, &settings.server.bind_addr()).await?;
    Ok(())
}
