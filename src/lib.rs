//! treebench - ordered-key store benchmark and regression harness
//!
//! Drives an [`OrderedKeyStore`] through randomized workloads: interval
//! sampled CSV benchmarks of single access patterns, a fixed regression
//! choreography with structural checks, and deliberate corruption to
//! confirm the store's verifier notices.
//!
//! # Modules
//!
//! - [`core_types`] - Key and timing type aliases
//! - [`store`] - Store contract and the `BTreeMap` adapter
//! - [`perf`] - Span timer and rate arithmetic
//! - [`bench`] - Workloads, interval planning, CSV benchmark runner
//! - [`regression`] - Regression stages and results table
//! - [`walkthrough`] - Small fixed demonstration of the store API
//! - [`cli`] / [`config`] - Command line, YAML settings, resolved run config
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod bench;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod perf;
pub mod regression;
pub mod store;
pub mod walkthrough;

// Convenient re-exports at crate root
pub use bench::{BenchMode, BenchmarkRunner, IntervalPlan, RandomSource, Workloads};
pub use config::{AppConfig, RunConfig};
pub use core_types::{Key, Nanos, OpCount};
pub use error::{CliError, ConfigError, HarnessError, VerifyPhase};
pub use perf::DurationTimer;
pub use regression::{Report, run_regression};
pub use store::{BTreeStore, FaultInjection, OrderedKeyStore};
