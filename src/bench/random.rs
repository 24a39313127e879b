//! Owned pseudo-random source for workload generation
//!
//! Each run constructs one [`RandomSource`] and hands it to whatever needs
//! randomness; there is no process-wide seed. The binary seeds from the
//! wall clock, tests from a fixed value.
//!
//! # Example
//!
//! ```rust
//! use treebench::bench::random::RandomSource;
//!
//! let mut rng = RandomSource::seeded(12345);
//! let value = rng.below(100);
//! assert!(value < 100);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Non-cryptographic, explicitly seeded PRNG
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: u64,
}

impl RandomSource {
    /// Create a source with a fixed seed (repeatable sequences).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a source seeded from the current wall-clock time.
    ///
    /// The seed is seconds plus microseconds since the epoch, so two runs
    /// started in the same microsecond get the same sequence. That is fine
    /// for workload shuffling; it is not meant to be unpredictable.
    pub fn from_wall_clock() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::seeded(now.as_secs().wrapping_add(u64::from(now.subsec_micros())))
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[low, high)`.
    ///
    /// # Panics
    /// If `low >= high`.
    #[inline]
    pub fn in_range(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..high)
    }

    /// Uniform value in `[0, bound)`.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        self.in_range(0, bound)
    }
}
