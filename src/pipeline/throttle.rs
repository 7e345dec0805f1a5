//! Cooperative rate limiting between category queries.
//!
//! The public Overpass mirrors share an unwritten budget, so each category
//! waits a fixed interval after the previous one finished. Time comes from a
//! [`Clock`] so the gate can be driven without real sleeping.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

pub trait Clock {
    /// Monotonic time since an arbitrary origin
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to; sleeping advances it instantly
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Lets at most one pass through per `interval`
#[derive(Debug)]
pub struct FixedIntervalGate<C> {
    clock: C,
    interval: Duration,
    last: Option<Duration>,
}

impl<C: Clock> FixedIntervalGate<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            last: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Block until the interval since the previous pass, or the last
    /// [`finish`](Self::finish), has elapsed.
    ///
    /// The first pass never waits. Returns how long this call slept.
    pub fn pass(&mut self) -> Duration {
        let mut waited = Duration::ZERO;
        if let Some(last) = self.last {
            let elapsed = self.clock.now().saturating_sub(last);
            if elapsed < self.interval {
                waited = self.interval - elapsed;
                log::debug!("Throttling for {} ms", waited.as_millis());
                self.clock.sleep(waited);
            }
        }
        self.last = Some(self.clock.now());
        waited
    }

    /// Mark the end of the work guarded by the last pass; the next pass
    /// waits a full interval from here
    pub fn finish(&mut self) {
        self.last = Some(self.clock.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pass_is_free() {
        let clock = ManualClock::new();
        let mut gate = FixedIntervalGate::new(&clock, Duration::from_secs(2));
        assert_eq!(gate.pass(), Duration::ZERO);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_waits_for_remaining_interval() {
        let clock = ManualClock::new();
        let mut gate = FixedIntervalGate::new(&clock, Duration::from_secs(2));
        gate.pass();

        clock.advance(Duration::from_millis(500));
        assert_eq!(gate.pass(), Duration::from_millis(1500));

        // Work slower than the interval needs no pause
        clock.advance(Duration::from_secs(3));
        assert_eq!(gate.pass(), Duration::ZERO);

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(1500)]);
        assert_eq!(clock.now(), Duration::from_millis(5000));
    }

    #[test]
    fn test_finish_restarts_the_interval() {
        let clock = ManualClock::new();
        let mut gate = FixedIntervalGate::new(&clock, Duration::from_secs(2));
        gate.pass();

        // A slow request that outlasts the interval still gets a full pause
        clock.advance(Duration::from_secs(30));
        gate.finish();
        assert_eq!(gate.pass(), Duration::from_secs(2));

        clock.advance(Duration::from_millis(500));
        gate.finish();
        clock.advance(Duration::from_millis(500));
        assert_eq!(gate.pass(), Duration::from_millis(1500));

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_millis(1500)]
        );
    }

    #[test]
    fn test_zero_interval_never_sleeps() {
        let clock = ManualClock::new();
        let mut gate = FixedIntervalGate::new(&clock, Duration::ZERO);
        for _ in 0..5 {
            gate.pass();
        }
        assert!(clock.sleeps().is_empty());
    }
}
