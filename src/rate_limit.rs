//! Request pacing for the translation service.
//!
//! One `RateLimiter` is shared by every reconciliation task in a run. It
//! bounds the number of requests in flight and keeps consecutive requests at
//! least `min_interval` apart.

use std::time::Duration;
use tokio::sync::{AcquireError, Mutex, Semaphore, SemaphorePermit};
use tokio::time::{sleep, Instant};
use tracing::debug;

#[derive(Debug)]
pub struct RateLimiter {
    in_flight: Semaphore,
    max_in_flight: usize,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

/// Slot held for the duration of one request.
///
/// Dropping it frees the in-flight slot.
#[derive(Debug)]
pub struct RatePermit<'a> {
    _slot: SemaphorePermit<'a>,
}

impl RateLimiter {
    /// Create a limiter with an explicit in-flight bound and spacing.
    ///
    /// A bound of zero is raised to one so that `acquire` can make progress.
    pub fn new(max_in_flight: usize, min_interval: Duration) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            in_flight: Semaphore::new(max_in_flight),
            max_in_flight,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Limiter for a requests-per-minute ceiling: requests are spaced by
    /// `60s / rpm` and at most `rpm` may be in flight.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self::new(rpm as usize, Duration::from_secs(60) / rpm)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Number of free in-flight slots.
    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.in_flight.available_permits()
    }

    /// Refuse every later `acquire`.
    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.in_flight.close();
    }

    /// Wait for an in-flight slot and for the pacing interval to elapse.
    ///
    /// The last-request lock is held across the pacing sleep, so waiting
    /// callers are released one interval apart.
    pub async fn acquire(&self) -> Result<RatePermit<'_>, AcquireError> {
        let slot = self.in_flight.acquire().await?;

        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Pacing translation request for {:?}", wait);
                sleep(wait).await;
            }
        }
        *last_request = Some(Instant::now());

        Ok(RatePermit { _slot: slot })
    }
}
