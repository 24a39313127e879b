//! Workload Generator - Fisher-Yates key permutations
//!
//! A workload is a uniformly random ordering of the keys `0..n`. Each run
//! uses three independent orderings: one to insert with, one to remove
//! with, one to search with.

use tracing::debug;

use super::random::RandomSource;
use crate::core_types::Key;

/// Uniform random permutation of `[0, n)`
///
/// Identity fill, then for each position `i` swap with a position drawn
/// uniformly from `[i, n)`. At step `i` every value not yet placed is
/// equally likely to land at `i`, so all `n!` orderings are equally likely.
///
/// `n` beyond the key space is cut to [`MAX_TEST_SIZE`](crate::core_types::MAX_TEST_SIZE).
pub fn generate(n: usize, rng: &mut RandomSource) -> Vec<Key> {
    let mut keys: Vec<Key> = (0..=Key::MAX).take(n).collect();
    let n = keys.len();
    for i in 0..n {
        let j = rng.in_range(i, n);
        keys.swap(i, j);
    }
    keys
}

/// The three key orderings driving one run
#[derive(Debug, Clone)]
pub struct Workloads {
    pub insertion: Vec<Key>,
    pub removal: Vec<Key>,
    pub search: Vec<Key>,
}

impl Workloads {
    /// Generate insertion, removal and search orderings of `[0, n)`.
    pub fn generate(n: usize, rng: &mut RandomSource) -> Self {
        let workloads = Self {
            insertion: generate(n, rng),
            removal: generate(n, rng),
            search: generate(n, rng),
        };
        debug!(size = n, seed = rng.seed(), "workloads generated");
        workloads
    }

    /// Keys per ordering
    pub fn len(&self) -> usize {
        self.insertion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(keys: &[Key]) -> bool {
        let mut seen = vec![false; keys.len()];
        for &k in keys {
            let k = k as usize;
            if k >= keys.len() || seen[k] {
                return false;
            }
            seen[k] = true;
        }
        true
    }

    #[test]
    fn test_generate_is_permutation() {
        let mut rng = RandomSource::seeded(42);
        for n in [1, 2, 3, 10, 100, 1000, 4097] {
            let keys = generate(n, &mut rng);
            assert_eq!(keys.len(), n);
            assert!(is_permutation(&keys), "not a permutation of [0, {})", n);
        }
    }

    #[test]
    fn test_generate_empty() {
        let mut rng = RandomSource::seeded(42);
        assert!(generate(0, &mut rng).is_empty());
    }

    #[test]
    fn test_generate_deterministic_for_seed() {
        let a = generate(500, &mut RandomSource::seeded(3));
        let b = generate(500, &mut RandomSource::seeded(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_actually_shuffles() {
        let keys = generate(1000, &mut RandomSource::seeded(11));
        let fixed_points = keys.iter().enumerate().filter(|(i, k)| *i == **k as usize).count();
        // Expected number of fixed points of a uniform permutation is 1
        assert!(fixed_points < 20, "too many fixed points: {}", fixed_points);
    }

    #[test]
    fn test_first_position_roughly_uniform() {
        // 3 keys, 6000 draws: each value should take position 0 about 2000 times
        let mut rng = RandomSource::seeded(2024);
        let mut hits = [0usize; 3];
        for _ in 0..6000 {
            hits[generate(3, &mut rng)[0] as usize] += 1;
        }
        for (value, &count) in hits.iter().enumerate() {
            assert!(
                (1700..2300).contains(&count),
                "value {} landed first {} times",
                value,
                count
            );
        }
    }

    #[test]
    fn test_workloads_independent_permutations() {
        let w = Workloads::generate(256, &mut RandomSource::seeded(5));
        assert_eq!(w.len(), 256);
        assert!(is_permutation(&w.insertion));
        assert!(is_permutation(&w.removal));
        assert!(is_permutation(&w.search));
        assert_ne!(w.insertion, w.removal);
    }
}
