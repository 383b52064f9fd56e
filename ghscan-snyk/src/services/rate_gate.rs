//! Shared rate gate for Snyk submissions
//!
//! One gate is built per run and handed to every repository worker, so the
//! configured rate bounds the aggregate submission rate, not the rate of a
//! single worker. GCRA via `governor`: in any window `W` at most
//! `ceil(W / interval) + burst` acquisitions succeed. Waiters queue behind a
//! `tokio::sync::Mutex`, which hands out turns first-come first-served, so
//! permits are granted in arrival order.

use crate::error::{ImporterError, ImporterResult};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Replenishment interval used by the importer unless configured
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Burst capacity used by the importer unless configured
pub const DEFAULT_BURST: u32 = 5;

/// The only way `acquire` fails
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("Rate gate wait cancelled")]
    Cancelled,
}

/// Aggregate limiter, safe for concurrent `acquire` calls
pub struct RateGate {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Held by the waiter whose turn it is
    queue: Mutex<()>,
    interval: Duration,
    burst: u32,
}

impl RateGate {
    /// Build a gate that replenishes one permit per `interval` and holds at
    /// most `burst` permits
    pub fn new(interval: Duration, burst: u32) -> ImporterResult<Self> {
        let burst_nz = NonZeroU32::new(burst)
            .ok_or_else(|| ImporterError::Config("rate gate burst must be > 0".to_string()))?;
        let quota = Quota::with_period(interval)
            .ok_or_else(|| {
                ImporterError::Config("rate gate interval must be > 0".to_string())
            })?
            .allow_burst(burst_nz);

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            queue: Mutex::new(()),
            interval,
            burst,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Wait for a permit, or give up when `cancel` fires
    ///
    /// Callers are served in arrival order. A cancelled wait consumes no
    /// permit and gives up its place in the queue.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), GateError> {
        if cancel.is_cancelled() {
            return Err(GateError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GateError::Cancelled),
            _ = self.next_permit() => Ok(()),
        }
    }

    async fn next_permit(&self) {
        let _turn = self.queue.lock().await;
        if self.limiter.check().is_ok() {
            return;
        }
        tracing::debug!(interval = ?self.interval, "Rate gate: waiting for permit");
        self.limiter.until_ready().await;
    }
}
