//! Regression Module
//!
//! The default (non-benchmark) run: a fixed sequence of store operations,
//! two fatal verification checkpoints, one optional corruption pass and a
//! results table.
//!
//! - [`suite`] - Stage sequence and fault injection
//! - [`report`] - Fixed-width results table

pub mod report;
pub mod suite;

pub use report::{Report, ReportRow, Unit, Value};
pub use suite::{CorruptionOutcome, RegressionOutcome, run_regression};
