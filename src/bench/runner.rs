//! Benchmark Runner - per-interval CSV timing of one access pattern
//!
//! # Flow
//! ```text
//! 1. Prepare (Remove / Search / DecrementalSearch): insert every key, untimed
//! 2. For each interval batch:
//!      time the batch → write "count,ns_per_op" to the primary stream
//! 3. Report hit count on the diagnostic stream (search modes)
//! ```
//!
//! Nothing here validates the store. A broken store shows up as a lower hit
//! count, never as an error.

use std::io::Write;
use std::ops::Range;

use tracing::info;

use super::interval::IntervalPlan;
use super::workload::Workloads;
use crate::core_types::{Key, Nanos, OpCount};
use crate::error::HarnessError;
use crate::perf::{DurationTimer, ns_per_op};
use crate::store::OrderedKeyStore;

/// Benchmark access pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchMode {
    /// No benchmark; the regression suite runs instead
    #[default]
    None,
    /// Time insertion of the insertion ordering
    Insert,
    /// Time removal of the removal ordering from a full store
    Remove,
    /// Time search of the search ordering in a full store
    Search,
    /// Time search of already-inserted keys while the store grows
    IncrementalSearch,
    /// Time search of the removal ordering while the store shrinks
    DecrementalSearch,
}

impl BenchMode {
    /// Map a command-line mode selector to its mode
    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            's' => Some(BenchMode::Insert),
            'm' => Some(BenchMode::Remove),
            'e' => Some(BenchMode::Search),
            'l' => Some(BenchMode::IncrementalSearch),
            'o' => Some(BenchMode::DecrementalSearch),
            _ => None,
        }
    }

    pub fn csv_header(&self) -> &'static str {
        match self {
            BenchMode::None => "",
            BenchMode::Insert => "node_count,ns_per_insertion",
            BenchMode::Remove => "node_count,ns_per_removal",
            BenchMode::Search => "iterations,ns_per_search",
            BenchMode::IncrementalSearch | BenchMode::DecrementalSearch => {
                "node_count,ns_per_search"
            }
        }
    }

    /// Whether the store must hold every key before measurement starts
    pub fn needs_preparation(&self) -> bool {
        matches!(
            self,
            BenchMode::Remove | BenchMode::Search | BenchMode::DecrementalSearch
        )
    }

    pub fn counts_hits(&self) -> bool {
        matches!(
            self,
            BenchMode::Search | BenchMode::IncrementalSearch | BenchMode::DecrementalSearch
        )
    }

    fn describe(&self) -> &'static str {
        match self {
            BenchMode::None => "nothing",
            BenchMode::Insert => "insertion",
            BenchMode::Remove => "removal",
            BenchMode::Search => "search",
            BenchMode::IncrementalSearch => "incremental search during insertion",
            BenchMode::DecrementalSearch => "search during removal",
        }
    }
}

/// One CSV sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRow {
    /// Cumulative keys/operations, never above the test size
    pub count: OpCount,
    pub ns_per_op: Nanos,
}

/// What a benchmark run produced besides the CSV stream
#[derive(Debug, Default)]
pub struct BenchOutcome {
    pub rows: Vec<SampleRow>,
    /// Keys inserted before measurement
    pub prepared: OpCount,
    /// Successful searches, for the search modes
    pub hits: Option<OpCount>,
}

/// Drives one store through one benchmark mode
pub struct BenchmarkRunner<'a, S: OrderedKeyStore> {
    store: &'a mut S,
    workloads: &'a Workloads,
    plan: IntervalPlan,
}

impl<'a, S: OrderedKeyStore> BenchmarkRunner<'a, S> {
    pub fn new(store: &'a mut S, workloads: &'a Workloads, plan: IntervalPlan) -> Self {
        Self {
            store,
            workloads,
            plan,
        }
    }

    /// Run `mode`, writing the CSV header and one row per interval to `out`
    ///
    /// [`BenchMode::None`] writes nothing and returns an empty outcome.
    pub fn run<W: Write>(
        &mut self,
        mode: BenchMode,
        out: &mut W,
    ) -> Result<BenchOutcome, HarnessError> {
        let mut outcome = BenchOutcome::default();
        if mode == BenchMode::None {
            return Ok(outcome);
        }

        let test_size = self.workloads.len();
        if mode.needs_preparation() {
            info!("Inserting {} random keys...", test_size);
            for &key in &self.workloads.insertion {
                self.store.insert(key);
            }
            outcome.prepared = test_size;
        }

        info!(
            interval = self.plan.interval(),
            "Generating CSV output for {} of {} random keys...",
            mode.describe(),
            test_size
        );
        writeln!(out, "{}", mode.csv_header())?;

        let plan = self.plan;
        let mut hits = 0;
        for batch in plan.batches(test_size) {
            let len = batch.len();
            let count = batch.end;
            let elapsed = self.run_batch(mode, batch, &mut hits);
            let row = SampleRow {
                count,
                ns_per_op: ns_per_op(elapsed, len),
            };
            writeln!(out, "{},{}", row.count, row.ns_per_op)?;
            outcome.rows.push(row);
        }
        out.flush()?;

        if mode.counts_hits() {
            info!("{} found.", hits);
            outcome.hits = Some(hits);
        } else {
            info!("done.");
        }
        Ok(outcome)
    }

    /// Perform one batch and return the timed part of it in nanoseconds
    fn run_batch(&mut self, mode: BenchMode, batch: Range<usize>, hits: &mut OpCount) -> Nanos {
        let w = self.workloads;
        let mut timer = DurationTimer::new();
        match mode {
            BenchMode::None => 0,
            BenchMode::Insert => {
                timer.start();
                for &key in &w.insertion[batch] {
                    self.store.insert(key);
                }
                timer.stop()
            }
            BenchMode::Remove => {
                timer.start();
                for &key in &w.removal[batch] {
                    self.store.delete_key(key);
                }
                timer.stop()
            }
            BenchMode::Search => {
                timer.start();
                *hits += self.search_all(&w.search[batch]);
                timer.stop()
            }
            BenchMode::IncrementalSearch => {
                for &key in &w.insertion[batch.clone()] {
                    self.store.insert(key);
                }
                // Near-uniform sample of everything inserted so far
                let inserted = batch.end;
                let sample: Vec<Key> = w.search[batch]
                    .iter()
                    .map(|&s| w.insertion[s as usize % inserted])
                    .collect();
                timer.start();
                *hits += self.search_all(&sample);
                timer.stop()
            }
            BenchMode::DecrementalSearch => {
                let keys = &w.removal[batch];
                timer.start();
                *hits += self.search_all(keys);
                let elapsed = timer.stop();
                for &key in keys {
                    self.store.delete_key(key);
                }
                elapsed
            }
        }
    }

    #[inline]
    fn search_all(&self, keys: &[Key]) -> OpCount {
        keys.iter()
            .filter(|&&key| self.store.search(key).is_some_and(|n| n.key == key))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::random::RandomSource;
    use crate::store::BTreeStore;

    fn run_mode(
        mode: BenchMode,
        n: usize,
        interval: Option<usize>,
    ) -> (BenchOutcome, String, BTreeStore) {
        let workloads = Workloads::generate(n, &mut RandomSource::seeded(17));
        let plan = IntervalPlan::resolve(n, interval);
        let mut store = BTreeStore::new();
        let mut out = Vec::new();
        let outcome = BenchmarkRunner::new(&mut store, &workloads, plan)
            .run(mode, &mut out)
            .expect("benchmark run failed");
        (outcome, String::from_utf8(out).unwrap(), store)
    }

    #[test]
    fn test_none_is_noop() {
        let (outcome, csv, store) = run_mode(BenchMode::None, 100, None);
        assert!(outcome.rows.is_empty());
        assert!(csv.is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_insert_mode_rows() {
        let (outcome, csv, store) = run_mode(BenchMode::Insert, 1000, None);
        // Interval resolves to 10
        assert_eq!(outcome.rows.len(), 100);
        assert_eq!(outcome.rows.last().unwrap().count, 1000);
        assert_eq!(outcome.prepared, 0);
        assert_eq!(outcome.hits, None);
        assert_eq!(store.count(), 1000);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("node_count,ns_per_insertion"));
        assert_eq!(lines.next().unwrap().split(',').next(), Some("10"));
        assert_eq!(lines.count(), 99);
    }

    #[test]
    fn test_uneven_last_batch_clamped() {
        // 1001 keys at interval 10 → 101 rows, last one holding a single key
        let (outcome, _, store) = run_mode(BenchMode::Insert, 1001, None);
        assert_eq!(outcome.rows.len(), 101);
        assert_eq!(outcome.rows[99].count, 1000);
        assert_eq!(outcome.rows[100].count, 1001);
        assert_eq!(store.count(), 1001);
    }

    #[test]
    fn test_remove_mode_empties_store() {
        let (outcome, csv, store) = run_mode(BenchMode::Remove, 500, None);
        assert_eq!(outcome.prepared, 500);
        assert_eq!(store.count(), 0);
        assert!(csv.starts_with("node_count,ns_per_removal\n"));
    }

    #[test]
    fn test_search_mode_finds_everything() {
        let (outcome, csv, store) = run_mode(BenchMode::Search, 100, None);
        assert_eq!(outcome.prepared, 100);
        assert_eq!(outcome.rows.len(), 50);
        assert_eq!(outcome.hits, Some(100));
        assert_eq!(store.count(), 100);
        assert!(csv.starts_with("iterations,ns_per_search\n"));
        assert!(outcome.rows.windows(2).all(|w| w[0].count < w[1].count));
    }

    #[test]
    fn test_incremental_search_hits_inserted_keys() {
        let (outcome, _, store) = run_mode(BenchMode::IncrementalSearch, 2000, None);
        // Every sampled key was inserted earlier in the same run
        assert_eq!(outcome.hits, Some(2000));
        assert_eq!(outcome.prepared, 0);
        assert_eq!(store.count(), 2000);
    }

    #[test]
    fn test_decremental_search_shrinks_store() {
        let (outcome, csv, store) = run_mode(BenchMode::DecrementalSearch, 300, Some(3));
        assert_eq!(outcome.hits, Some(300));
        assert_eq!(outcome.rows.len(), 100);
        assert_eq!(store.count(), 0);
        assert!(csv.starts_with("node_count,ns_per_search\n"));
    }

    #[test]
    fn test_preparation_tops_up_partial_store() {
        let workloads = Workloads::generate(100, &mut RandomSource::seeded(1));
        let mut store = BTreeStore::new();
        for k in 0..40 {
            store.insert(k);
        }
        let plan = IntervalPlan::resolve(100, None);
        let mut runner = BenchmarkRunner::new(&mut store, &workloads, plan);
        let outcome = runner.run(BenchMode::Search, &mut std::io::sink()).unwrap();
        assert_eq!(outcome.hits, Some(100));
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(BenchMode::from_flag('s'), Some(BenchMode::Insert));
        assert_eq!(BenchMode::from_flag('m'), Some(BenchMode::Remove));
        assert_eq!(BenchMode::from_flag('e'), Some(BenchMode::Search));
        assert_eq!(BenchMode::from_flag('l'), Some(BenchMode::IncrementalSearch));
        assert_eq!(BenchMode::from_flag('o'), Some(BenchMode::DecrementalSearch));
        assert_eq!(BenchMode::from_flag('x'), None);
    }
}
