//! Retry bookkeeping for the content fetcher
//!
//! Only transport failures are retried. The pause before each retry is drawn
//! uniformly from `[min, max]`, so concurrent runs against the same site do not
//! retry in lockstep.

use crate::config::FetcherConfig;
use rand::Rng;
use std::time::Duration;

/// Bounded retry with uniformly random backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    max_retries: u32,

    /// Backoff bounds in seconds
    backoff_min: f64,
    backoff_max: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1.0, 5.0)
    }
}

impl RetryPolicy {
    /// Creates a policy; the bounds are swapped if given in the wrong order
    /// and negative values are clamped to zero
    pub fn new(max_retries: u32, backoff_min: f64, backoff_max: f64) -> Self {
        let (low, high) = if backoff_min <= backoff_max {
            (backoff_min, backoff_max)
        } else {
            (backoff_max, backoff_min)
        };

        Self {
            max_retries,
            backoff_min: low.max(0.0),
            backoff_max: high.max(0.0),
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.max_retries, config.backoff_min, config.backoff_max)
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::new(0, 0.0, 0.0)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// True if another attempt may follow `retries_done` retries
    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Random pause before the next attempt
    pub fn backoff(&self) -> Duration {
        if self.backoff_max <= self.backoff_min {
            return Duration::from_secs_f64(self.backoff_min);
        }
        let seconds = rand::thread_rng().gen_range(self.backoff_min..=self.backoff_max);
        Duration::from_secs_f64(seconds)
    }
}
