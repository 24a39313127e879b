//! Interval Planner - CSV sample spacing
//!
//! Decides how many operations go into each benchmark sample. The rules
//! keep at least 100 samples per run where the test size allows it and
//! never let the interval drop below 2.

/// Interval used when none is requested
pub const DEFAULT_INTERVAL: usize = 1000;

/// Fewest samples a run should produce
pub const MIN_SAMPLES: usize = 100;

/// Smallest interval ever used
pub const MIN_INTERVAL: usize = 2;

/// Resolved batch size for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPlan {
    interval: usize,
}

impl IntervalPlan {
    /// Resolve the effective interval.
    ///
    /// 1. Unset or zero request → [`DEFAULT_INTERVAL`]
    /// 2. Fewer than [`MIN_SAMPLES`] samples → `test_size / MIN_SAMPLES`
    /// 3. Below [`MIN_INTERVAL`] → [`MIN_INTERVAL`]
    pub fn resolve(test_size: usize, requested: Option<usize>) -> Self {
        let mut interval = match requested {
            Some(i) if i > 0 => i,
            _ => DEFAULT_INTERVAL,
        };
        if test_size / interval < MIN_SAMPLES {
            interval = test_size / MIN_SAMPLES;
        }
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Batch ranges covering `[0, test_size)`, the last one clamped
    pub fn batches(&self, test_size: usize) -> impl Iterator<Item = std::ops::Range<usize>> {
        let interval = self.interval;
        (0..test_size)
            .step_by(interval)
            .map(move |start| start..(start + interval).min(test_size))
    }

    /// Number of batches (CSV rows) for `test_size` operations
    pub fn batch_count(&self, test_size: usize) -> usize {
        test_size.div_ceil(self.interval)
    }
}
