//! Request pacing for the listing API.
//!
//! The pipeline calls [`RateGate::ready`] before every request. Gates use
//! `tokio::time`, so tests run them on a paused clock with no real waiting.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep_until, Instant};

#[async_trait]
pub trait RateGate: Send {
    /// Resolves once the next request may be sent.
    async fn ready(&mut self);
}

/// Enforces a fixed minimum spacing between consecutive requests.
///
/// The first request passes immediately. A zero interval never waits.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Instant>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }
}

#[async_trait]
impl RateGate for IntervalGate {
    async fn ready(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}
