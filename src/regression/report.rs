//! Report Formatter - fixed-width results table
//!
//! Rows are appended while the suite runs and rendered once at the end.

use std::fmt;

use crate::core_types::{Nanos, OpCount};
use crate::perf::{ns_per_op, rate_per_sec};

const LABEL_WIDTH: usize = 32;
const VALUE_WIDTH: usize = 11;
const UNIT_WIDTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    NsPerKey,
    NodesPerSec,
    HitsPerSec,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::NsPerKey => write!(f, "ns/key"),
            Unit::NodesPerSec => write!(f, "nodes/s"),
            Unit::HitsPerSec => write!(f, "hit/s"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Count(u64),
    Rate(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Count(v) => write!(f, "{}", v),
            Value::Rate(v) => write!(f, "{:.0}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub value: Value,
    pub unit: Unit,
}

/// Ordered, append-only list of measured results
#[derive(Debug, Clone, Default)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: Value, unit: Unit) {
        self.rows.push(ReportRow {
            label: label.into(),
            value,
            unit,
        });
    }

    /// Append an `ns/key` row for `ops` operations taking `elapsed` ns
    pub fn per_key(&mut self, label: impl Into<String>, elapsed: Nanos, ops: OpCount) {
        self.push(label, Value::Count(ns_per_op(elapsed, ops)), Unit::NsPerKey);
    }

    /// Append a per-second rate row for `ops` operations taking `elapsed` ns
    pub fn rate(&mut self, label: impl Into<String>, elapsed: Nanos, ops: OpCount, unit: Unit) {
        self.push(label, Value::Rate(rate_per_sec(elapsed, ops)), unit);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn find(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "+{}+{}+{}+",
            "-".repeat(LABEL_WIDTH + 1),
            "-".repeat(VALUE_WIDTH + 2),
            "-".repeat(UNIT_WIDTH + 2)
        )
    }

    fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &str, unit: &str) -> fmt::Result {
        writeln!(
            f,
            "| {:<lw$}| {:<vw$} | {:<uw$} |",
            label,
            value,
            unit,
            lw = LABEL_WIDTH,
            vw = VALUE_WIDTH,
            uw = UNIT_WIDTH
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::rule(f)?;
        Self::line(f, "Test", "result", "unit")?;
        Self::rule(f)?;
        for row in &self.rows {
            Self::line(f, &row.label, &row.value.to_string(), &row.unit.to_string())?;
        }
        Self::rule(f)
    }
}
