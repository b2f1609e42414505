// Interval rate limiter for hosted inference calls.
//
// The hosted API throttles aggressively on the free tier. Each acquire()
// reserves the next free slot, spaced `1 / requests_per_second` apart, and
// sleeps until that slot arrives. Concurrent enrichment tasks share one
// limiter, so slots are handed out in lock order.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Spaces requests at least `interval` apart across all clones.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// A limiter allowing `requests_per_second` calls. Zero or negative
    /// rates disable throttling.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Minimum spacing between requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for this caller's slot.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let wait_until = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(wait_until).await;
    }
}
