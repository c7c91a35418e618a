use log::debug;
use std::time::Duration;

/// Spacing between consecutive search requests.
///
/// Every request is followed by a pause of at least `base`. Each rate-limited
/// answer doubles the pause, capped at `max`; the next request that is not rate
/// limited brings it back to `base`.
#[derive(Debug, Clone)]
pub struct Throttle {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Throttle {
    pub fn new(base: Duration, max: Duration) -> Self {
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    /// Works out the pause to take after a request.
    pub fn next_delay(&mut self, rate_limited: bool) -> Duration {
        if rate_limited {
            self.current = self.current.saturating_mul(2).min(self.max).max(self.base);
            self.current
        } else {
            self.current = self.base;
            self.base
        }
    }

    pub async fn pause(&mut self, rate_limited: bool) {
        let delay = self.next_delay(rate_limited);
        debug!("Waiting {:?} before the next request", delay);
        tokio::time::sleep(delay).await;
    }
}
