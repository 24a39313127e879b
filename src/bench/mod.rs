//! Benchmark Harness Module
//!
//! Workload generation and interval-sampled timing of a single access
//! pattern against an [`OrderedKeyStore`](crate::store::OrderedKeyStore).
//!
//! # Components
//!
//! - [`random`] - Owned, explicitly seeded PRNG
//! - [`workload`] - Fisher-Yates key permutations
//! - [`interval`] - CSV sample spacing
//! - [`runner`] - Mode-driven CSV benchmark loop

pub mod interval;
pub mod random;
pub mod runner;
pub mod workload;

pub use interval::IntervalPlan;
pub use random::RandomSource;
pub use runner::{BenchMode, BenchOutcome, BenchmarkRunner, SampleRow};
pub use workload::Workloads;
