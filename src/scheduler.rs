use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::db::Store;

/// Periodically evicts expired retrieval and value cache rows. Reads already
/// filter expired entries out, so the only job here is keeping the tables
/// from growing without bound.
pub struct Scheduler {
    store: Store,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(store: Store, config: SchedulerConfig) -> Self {
        Self {
            store,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let store = self.store.clone();
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let store = store.clone();
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = clear_expired(&store).await {
                    error!("Scheduled cache cleanup failed: {}", e);
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.cleanup_interval_minutes;

        info!("Scheduler running every {} minutes", interval_mins);

        let mut cleanup_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));

        loop {
            cleanup_interval.tick().await;

            if !*self.running.read().await {
                break;
            }
            if let Err(e) = clear_expired(&self.store).await {
                error!("Scheduled cache cleanup failed: {}", e);
            }
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn run_once(&self) -> Result<()> {
        info!("Running manual cache cleanup...");
        clear_expired(&self.store).await
    }
}

async fn clear_expired(store: &Store) -> Result<()> {
    let (retrievals, values) = store.clear_expired_cache().await?;

    if retrievals > 0 || values > 0 {
        info!(retrievals, values, "Expired cache entries removed");
    } else {
        debug!("No expired cache entries");
    }

    Ok(())
}
