//! Jittered exponential backoff between transport retries.

use std::future::IntoFuture;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Sleep;

/// Default base delay of 100 milliseconds.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Default maximum delay of 10 seconds.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Delay bounds for a [`Backoff`]. The retry budget itself is supplied per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    // opting to have these be u32s, rather than full on [`Duration`]s.
    base_delay_ms: u32,
    max_delay_ms: u32,
}

impl BackoffConfig {
    pub const fn new(base_delay: Duration, max_delay: Duration) -> Self {
        const fn clamp_ms(dur: Duration, min: u32) -> u32 {
            let ms = dur.as_millis();

            if ms > u32::MAX as u128 {
                u32::MAX
            } else if (ms as u32) < min {
                min
            } else {
                ms as u32
            }
        }

        Self {
            base_delay_ms: clamp_ms(base_delay, 1),
            max_delay_ms: clamp_ms(max_delay, 1),
        }
    }

    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms as u64)
    }

    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms as u64)
    }

    #[inline]
    fn compute_backoff<R>(&self, retries: u32, rng: &mut R) -> Duration
    where
        R: Rng + ?Sized,
    {
        let slots = 2_u32.saturating_pow(retries);
        let full_delay_ms = slots.saturating_mul(self.base_delay_ms);

        let sleep_ms = rng.random_range(self.base_delay_ms..=full_delay_ms);

        Duration::from_millis(sleep_ms.min(self.max_delay_ms) as u64)
    }

    pub fn make_backoff(&self, max_retries: u32) -> Backoff {
        Backoff {
            config: *self,
            max_retries,
            retries: 0,
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY)
    }
}

#[derive(Debug, Clone)]
pub struct Backoff<R = SmallRng> {
    config: BackoffConfig,
    max_retries: u32,
    retries: u32,
    rng: R,
}

/// A single backoff step. Awaiting it sleeps for [`BackoffOnce::waiting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackoffOnce {
    max_retries: u32,
    on_retry: u32,
    waiting: Duration,
}

impl BackoffOnce {
    pub const fn on_retry(&self) -> u32 {
        self.on_retry
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub const fn waiting(&self) -> Duration {
        self.waiting
    }
}

impl IntoFuture for BackoffOnce {
    type Output = ();
    type IntoFuture = Sleep;

    fn into_future(self) -> Self::IntoFuture {
        tokio::time::sleep(self.waiting)
    }
}

impl<R: Rng> Backoff<R> {
    #[inline]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the next backoff step, or [`None`] once the retry budget is spent.
    pub fn backoff_once(&mut self) -> Option<BackoffOnce> {
        if self.retries >= self.max_retries {
            return None;
        }

        self.retries += 1;

        Some(BackoffOnce {
            on_retry: self.retries,
            max_retries: self.max_retries,
            waiting: self.config.compute_backoff(self.retries, &mut self.rng),
        })
    }
}
