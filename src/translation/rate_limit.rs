/*!
 * Minimum-spacing rate limiter for backend calls.
 *
 * Callers `acquire()` before each request. The first call proceeds at once;
 * every later call waits until `interval` has passed since the previous one.
 * Waiters are served in arrival order and none is dropped.
 */

use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    /// Time the previous call was let through
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing at most one call per `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// A limiter that never waits
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a call is allowed, then record it.
    ///
    /// The lock is held across the wait, so concurrent callers are served in
    /// FIFO order and at least `interval` apart.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                debug!(
                    "Rate limiter: waiting {:?} before next backend call",
                    ready_at.saturating_duration_since(Instant::now())
                );
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    /// Forget the previous call so the next one proceeds immediately
    pub async fn reset(&self) {
        *self.last_call.lock().await = None;
    }
}
