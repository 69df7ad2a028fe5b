// src/throttle.rs

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{thread, time::Duration};
use tracing::debug;

use crate::{config::DelayConfig, error::Result};

type Sleeper = Box<dyn FnMut(Duration)>;

/// Politeness pause between page fetches: a uniform random delay in `[min, max]`.
pub struct Throttle {
    min: Duration,
    max: Duration,
    rng: StdRng,
    sleeper: Sleeper,
}

impl Throttle {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            rng: StdRng::from_entropy(),
            sleeper: Box::new(thread::sleep),
        }
    }

    pub fn from_config(delay: &DelayConfig) -> Result<Self> {
        let (min, max) = delay.bounds()?;
        Ok(Self::new(min, max))
    }

    /// A throttle that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO).with_sleeper(|_| {})
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the real sleep, e.g. to record delays in tests.
    pub fn with_sleeper<F: FnMut(Duration) + 'static>(mut self, sleeper: F) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn next_delay(&mut self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = self
            .rng
            .gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Wait for one sampled delay and return it.
    pub fn pause(&mut self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "throttle");
            (self.sleeper)(delay);
        }
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Instant,
    };

    #[test]
    fn test_delays_stay_in_range() {
        let mut t = Throttle::new(Duration::from_secs(1), Duration::from_secs(3))
            .with_seed(7)
            .with_sleeper(|_| {});
        for _ in 0..200 {
            let d = t.pause();
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(3), "{d:?}");
        }
    }

    #[test]
    fn test_sleeper_sees_every_delay() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut t = Throttle::new(Duration::from_millis(10), Duration::from_millis(20))
            .with_seed(1)
            .with_sleeper(move |d| sink.lock().unwrap().push(d));

        let returned: Vec<Duration> = (0..3).map(|_| t.pause()).collect();
        assert_eq!(*seen.lock().unwrap(), returned);
    }

    #[test]
    fn test_same_seed_same_delays() {
        let mut a = Throttle::new(Duration::ZERO, Duration::from_secs(5)).with_seed(42);
        let mut b = Throttle::new(Duration::ZERO, Duration::from_secs(5)).with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_disabled_does_not_wait() {
        let mut t = Throttle::disabled();
        let start = Instant::now();
        assert_eq!(t.pause(), Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_from_config_rejects_unrepresentable_delay() {
        let huge = DelayConfig {
            min_secs: 1.0,
            max_secs: 1e300,
        };
        assert!(Throttle::from_config(&huge).is_err());
        assert!(Throttle::from_config(&DelayConfig::default()).is_ok());
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let mut t = Throttle::new(Duration::from_secs(2), Duration::from_secs(1))
            .with_seed(3)
            .with_sleeper(|_| {});
        let d = t.pause();
        assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(2));
    }
}
