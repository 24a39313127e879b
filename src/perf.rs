//! Performance Timing - span measurement and rate arithmetic
//!
//! Every measured phase of the harness goes through a [`DurationTimer`];
//! the helpers below turn its elapsed nanoseconds into the per-key and
//! per-second figures that end up in CSV rows and the report table.

use std::time::Instant;

use crate::core_types::{Nanos, OpCount};

/// Monotonic timer for a single measured span
///
/// Backed by [`Instant`], so wall-clock adjustments never show up in a
/// measurement. One span per instance at a time; nest spans by using
/// separate timers.
#[derive(Debug, Default)]
pub struct DurationTimer {
    started: Option<Instant>,
}

impl DurationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or restart) the span
    #[inline]
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// End the span and return its length in nanoseconds
    ///
    /// Returns 0 if the timer was never started.
    #[inline]
    pub fn stop(&mut self) -> Nanos {
        self.started
            .take()
            .map(|t| t.elapsed().as_nanos() as Nanos)
            .unwrap_or(0)
    }

    /// Time a closure, returning its result and the elapsed nanoseconds
    #[inline]
    pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Nanos) {
        let mut timer = Self::new();
        timer.start();
        let result = f();
        (result, timer.stop())
    }
}

/// Average nanoseconds per operation, 0 for an empty batch
#[inline]
pub fn ns_per_op(elapsed: Nanos, ops: OpCount) -> Nanos {
    if ops == 0 {
        0
    } else {
        elapsed / ops as Nanos
    }
}

/// Operations per second for `ops` operations completed in `elapsed` ns
///
/// A zero-length span (coarse clock, tiny batch) is treated as 1 ns so the
/// rate stays finite.
#[inline]
pub fn rate_per_sec(elapsed: Nanos, ops: OpCount) -> f64 {
    (1_000_000_000.0 / elapsed.max(1) as f64) * ops as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_span() {
        let mut timer = DurationTimer::new();
        timer.start();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let elapsed = timer.stop();
        assert!(elapsed >= 2_000_000, "expected >= 2ms, got {} ns", elapsed);
    }

    #[test]
    fn test_stop_without_start() {
        let mut timer = DurationTimer::new();
        assert_eq!(timer.stop(), 0);

        timer.start();
        timer.stop();
        // Span already consumed
        assert_eq!(timer.stop(), 0);
    }

    #[test]
    fn test_nested_timers() {
        let mut outer = DurationTimer::new();
        let mut inner = DurationTimer::new();
        outer.start();
        inner.start();
        let inner_ns = inner.stop();
        let outer_ns = outer.stop();
        assert!(outer_ns >= inner_ns);
    }

    #[test]
    fn test_measure_returns_result() {
        let (sum, _ns) = DurationTimer::measure(|| (1..=10).sum::<u32>());
        assert_eq!(sum, 55);
    }

    #[test]
    fn test_rates() {
        assert_eq!(ns_per_op(1_000, 10), 100);
        assert_eq!(ns_per_op(1_000, 0), 0);
        assert!((rate_per_sec(1_000_000_000, 500) - 500.0).abs() < 1e-9);
        assert!(rate_per_sec(0, 10).is_finite());
    }
}
