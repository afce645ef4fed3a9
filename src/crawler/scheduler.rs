//! Periodic crawl runner
//!
//! Runs a job immediately and then once per interval until shut down. A run
//! that outlasts the interval delays the next tick instead of overlapping it.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Scheduler for repeated crawl runs
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn every_hours(hours: u64) -> Self {
        Self::new(Duration::from_secs(hours.saturating_mul(3600)))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `job` on every tick until `shutdown` resolves
    ///
    /// A failed run is logged and the schedule continues. Shutdown is honored
    /// both between runs and during one; an interrupted run is dropped.
    ///
    /// # Returns
    ///
    /// The number of runs that finished, successfully or not
    pub async fn run<F, Fut, T, E>(&self, mut job: F, shutdown: impl Future<Output = ()>) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "Scheduler started - will run every {:.1} hours",
            self.interval.as_secs_f64() / 3600.0
        );

        let mut finished = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {}
            }

            tokio::select! {
                result = job() => {
                    finished += 1;
                    match result {
                        Ok(_) => info!("Scheduled crawl completed successfully"),
                        Err(e) => error!("Scheduled crawl failed: {}", e),
                    }
                }
                _ = &mut shutdown => {
                    info!("Scheduler stopped during a run");
                    break;
                }
            }
        }

        finished
    }
}
