//! Politeness between consecutive requests to the upstream shop.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until the next request may start.
    async fn pace(&self);
}

/// Guarantees at least `interval` between the starts of consecutive requests.
///
/// The first call never waits. Calls are serialised, so two callers can never
/// be released inside the same interval.
#[derive(Debug)]
pub struct FixedIntervalPacer {
    interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: Mutex::new(None),
        }
    }
}

impl Default for FixedIntervalPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[async_trait::async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pace(&self) {
        let mut last_release = self.last_release.lock().await;
        if let Some(previous) = *last_release {
            tokio::time::sleep_until(previous + self.interval).await;
        }
        *last_release = Some(Instant::now());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

#[async_trait::async_trait]
impl Pacer for NoPacing {
    async fn pace(&self) {}
}
