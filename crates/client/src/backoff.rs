//! Capped exponential backoff with full jitter.
//!
//! Each delay is drawn uniformly from zero to the current cap, and the
//! cap doubles per attempt up to a maximum. Full jitter keeps a herd of
//! retrying clients from synchronizing against the Authority.

use rand::Rng;
use std::time::Duration;

/// A retry-delay generator.
#[derive(Debug)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    attempt: u32,
}

impl Backoff {
    /// Creates a generator starting at `base`, never exceeding `cap`.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap,
            attempt: 0,
        }
    }

    /// The default policy for talking to the Authority.
    pub fn for_authority() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_secs(10))
    }

    /// Draws the next delay and advances the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let exp = self.base.saturating_mul(1u32 << self.attempt.min(16));
        let ceiling = exp.min(self.cap);
        self.attempt = self.attempt.saturating_add(1);
        let millis = ceiling.as_millis().max(1) as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
    }

    /// Resets the attempt counter after a success.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stay_under_cap() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(2));
        for _ in 0..20 {
            assert!(backoff.next_delay() <= Duration::from_secs(2));
        }
    }

    #[test]
    fn reset_restarts_the_ramp() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(60));
        for _ in 0..5 {
            backoff.next_delay();
        }
        backoff.reset();
        // After a reset the ceiling is back to the base; a draw can never
        // exceed it.
        assert!(backoff.next_delay() <= Duration::from_millis(100));
    }
}
