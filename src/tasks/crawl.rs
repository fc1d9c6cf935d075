//! Crawler Scheduling Task
//!
//! Drives crawl cycles on a fixed interval until asked to stop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::cache::Crawler;

// == Crawler Handle ==
/// Handle to a running crawler task. Dropping it also stops the task.
#[derive(Debug)]
pub struct CrawlerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CrawlerHandle {
    /// Stops the task after any in-flight cycle finishes and waits for it.
    pub async fn shutdown(self) {
        // Err only means the task already exited
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!("Crawler task ended abnormally: {}", err);
        }
    }

    /// Stops the task immediately, even mid-cycle.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that runs one crawl cycle immediately and then
/// one per `interval_secs`.
///
/// Each cycle walks up to `capacity` entries synchronously, so it runs on the
/// blocking pool rather than a runtime worker. A cycle is never interrupted by
/// shutdown; the stop signal is only observed between cycles.
///
/// # Arguments
/// * `crawler` - Crawler bound to the cache to sweep
/// * `interval_secs` - Seconds between cycles (minimum one second)
///
/// # Returns
/// A [`CrawlerHandle`] used to stop the task.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LruCache::new(1000)?);
/// let handle = spawn_crawler_task(Crawler::new(cache.clone()), 1);
/// // Later, during shutdown:
/// handle.shutdown().await;
/// ```
pub fn spawn_crawler_task<V>(crawler: Crawler<V>, interval_secs: u64) -> CrawlerHandle
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            "Starting TTL crawler with interval of {} seconds",
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                _ = ticker.tick() => {
                    let cycle = crawler.clone();
                    if let Err(err) = tokio::task::spawn_blocking(move || cycle.crawl()).await {
                        warn!("Crawl cycle failed: {}", err);
                    }
                }
            }
        }

        info!("TTL crawler stopped");
    });

    CrawlerHandle { shutdown, task }
}
