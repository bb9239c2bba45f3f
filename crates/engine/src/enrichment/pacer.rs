//! Inter-batch pacing
//!
//! Provider courtesy delays go through this seam so tests run without
//! wall-clock waits.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real pacer: sleeps for the requested interval
pub struct IntervalPacer;

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test pacer: returns immediately, optionally counting pauses
#[derive(Default)]
pub struct NoopPacer {
    pauses: std::sync::atomic::AtomicUsize,
}

impl NoopPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self, _duration: Duration) {
        self.pauses
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}
