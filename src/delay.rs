use std::thread;
use std::time::Duration;

use rand::Rng;

/// Polite pause between successive requests to the remote site.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    base: Duration,
    jitter: Duration,
}

impl Pacer {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// `base` plus a uniform random extra in `0..=jitter`.
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let max_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra_ms = rand::thread_rng().gen_range(0..=max_ms);
        self.base.saturating_add(Duration::from_millis(extra_ms))
    }

    pub fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        log::info!("Waiting {:.1}s before next request...", delay.as_secs_f64());
        thread::sleep(delay);
    }
}
