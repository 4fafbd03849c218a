//! Startup reset and repopulation of the index.
//!
//! Ordered phase: clear -> generate -> bulk save -> count -> mark ready.
//! A failed clear aborts startup. A failed or timed-out bulk save is retried
//! once (after clearing again) and otherwise only logged, leaving the index
//! with whatever it holds. A timed-out write is always settled before the
//! next step, so nothing from bootstrap is written once the service is ready.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use carsearch_core::config::BootstrapConfig;
use carsearch_core::error::{Error, Result};
use carsearch_core::generator::CarGenerator;
use carsearch_core::traits::CarIndex;
use carsearch_core::types::Car;

/// Set once bootstrap has finished; traffic is accepted only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self { Self::default() }
    pub fn is_ready(&self) -> bool { self.0.load(Ordering::Acquire) }
    pub fn mark_ready(&self) { self.0.store(true, Ordering::Release) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub generated: usize,
    pub indexed: u64,
    pub attempts: u32,
    /// Last bulk-save failure when no attempt succeeded.
    pub bulk_error: Option<String>,
}

impl BootstrapReport {
    pub fn is_complete(&self) -> bool { self.bulk_error.is_none() }
}

pub struct Bootstrap<I> {
    index: Arc<I>,
    config: BootstrapConfig,
    readiness: Readiness,
}

impl<I: CarIndex + 'static> Bootstrap<I> {
    pub fn new(index: Arc<I>, config: BootstrapConfig, readiness: Readiness) -> Self {
        Self { index, config, readiness }
    }

    pub async fn run<R: Rng>(&self, generator: &mut CarGenerator<R>) -> Result<BootstrapReport> {
        self.clear().await?;
        tracing::info!("Cleared car index");

        let cars = generator.generate_batch(self.config.batch_size);
        let generated = cars.len();
        tracing::info!(generated, "Generated cars");

        let max_attempts = if self.config.retry { 2 } else { 1 };
        let mut attempts = 0;
        let mut bulk_error = None;
        while attempts < max_attempts {
            attempts += 1;
            if attempts > 1 {
                if let Err(e) = self.clear().await {
                    tracing::warn!(error = %e, "Could not clear index before retrying bulk save");
                    bulk_error = Some(e.to_string());
                    break;
                }
            }
            match self.save_batch(cars.clone()).await {
                Ok(saved) => {
                    tracing::info!(attempt = attempts, saved, "Bulk save succeeded");
                    bulk_error = None;
                    break;
                }
                Err(e) => {
                    tracing::warn!(attempt = attempts, error = %e, "Bulk save failed");
                    bulk_error = Some(e.to_string());
                }
            }
        }

        let indexed = match self.count().await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "Could not count cars after bootstrap");
                0
            }
        };
        if let Some(error) = &bulk_error {
            tracing::warn!(indexed, error = %error, "Bootstrap incomplete, serving partial data");
        }
        tracing::info!("Saved {} cars", indexed);

        self.readiness.mark_ready();
        Ok(BootstrapReport { generated, indexed, attempts, bulk_error })
    }

    async fn clear(&self) -> Result<()> {
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || index.delete_all())
            .await
            .map_err(Error::index_unavailable)?
    }

    /// One bulk-save attempt. A timed-out attempt still counts as failed, but
    /// is awaited until its blocking write settles so it can never land after
    /// the retry's clear or once traffic is accepted.
    async fn save_batch(&self, cars: Vec<Car>) -> Result<usize> {
        let index = Arc::clone(&self.index);
        let timeout: Duration = self.config.save_timeout();
        let mut task = tokio::task::spawn_blocking(move || index.save_all(cars));
        match tokio::time::timeout(timeout, &mut task).await {
            Ok(joined) => joined.map_err(Error::index_unavailable)?.map(|saved| saved.len()),
            Err(_) => {
                tracing::warn!(?timeout, "Bulk save timed out, waiting for the in-flight write to settle");
                match task.await.map_err(Error::index_unavailable)? {
                    Ok(saved) => tracing::warn!(saved = saved.len(), "Timed-out bulk save committed late"),
                    Err(e) => tracing::warn!(error = %e, "Timed-out bulk save failed"),
                }
                Err(Error::IndexUnavailable(format!("bulk save timed out after {:?}", timeout)))
            }
        }
    }

    async fn count(&self) -> Result<u64> {
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || index.count())
            .await
            .map_err(Error::index_unavailable)?
    }
}
