//! Core types used throughout the harness
//!
//! Type aliases give the raw integers flowing between the workload
//! generator, the store and the timing code a semantic name.

/// Store key.
///
/// # Constraints:
/// - Workload keys are always drawn from `[0, test_size)`
/// - Unsigned 32-bit, matching the store's key width
pub type Key = u32;

/// Largest test size whose keys `[0, test_size)` all fit in a [`Key`]
pub const MAX_TEST_SIZE: u64 = Key::MAX as u64 + 1;

/// Elapsed time in nanoseconds, as produced by [`crate::perf::DurationTimer`]
pub type Nanos = u64;

/// Number of keys/operations in a run or batch
pub type OpCount = usize;
