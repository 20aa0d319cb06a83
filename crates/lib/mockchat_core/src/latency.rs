//! Artificial response latency.
//!
//! The question endpoint pauses before replying so the demo feels like a real
//! inference call. Tests swap in [`NoLatency`].

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Default lower bound of the simulated delay.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(400);

/// Default upper bound of the simulated delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(1200);

/// Something that can hold a reply back for a while.
#[async_trait]
pub trait Latency: Send + Sync {
    async fn wait(&self);
}

/// Sleeps for a uniformly random duration within `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomLatency {
    min: Duration,
    max: Duration,
}

impl RandomLatency {
    /// Bounds are reordered if given backwards.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Pick the next delay.
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Default for RandomLatency {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY, DEFAULT_MAX_DELAY)
    }
}

#[async_trait]
impl Latency for RandomLatency {
    async fn wait(&self) {
        let delay = self.sample();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "simulating response latency");
        tokio::time::sleep(delay).await;
    }
}

/// Replies immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn wait(&self) {}
}
