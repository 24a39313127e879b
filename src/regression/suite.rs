//! Regression Suite - fixed multi-stage store choreography
//!
//! # Stages
//! ```text
//!  1. insert N (random order)           measured
//!  2. verify                            measured, fatal on failure
//!  3. search N (random order)           measured
//!  4. search N (sequential)             measured
//!  5-8. in-order / breadth-first walks, with and without tracking
//!  9. destroy                           measured
//! 10. recreate, insert N (random)
//! 11. remove N (sequential)             measured
//! 12. insert N (sequential)             measured
//! 13. remove N (sequential)
//! 14. insert N (random)
//! 15. remove keys >= K (removal order)  measured
//! 16. table, snapshot, verify           fatal on failure
//! 17. force up to B nodes red, snapshot, verify (reported only)
//! 18. release everything
//! ```

use std::io::Write;

use tracing::{debug, error, info, warn};

use super::report::{Report, Unit};
use crate::bench::{RandomSource, Workloads};
use crate::config::RunConfig;
use crate::core_types::{Key, OpCount};
use crate::error::{HarnessError, VerifyPhase};
use crate::perf::DurationTimer;
use crate::store::{Direction, FaultInjection, NullPolicy, OrderedKeyStore, VerifyMode};

/// Result of the corruption stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorruptionOutcome {
    /// Random keys tried
    pub attempts: usize,
    /// Attempts that found a node and forced it red
    pub recoloured: usize,
    /// Whether verification noticed
    pub detected: bool,
}

/// Everything a regression run observed
#[derive(Debug)]
pub struct RegressionOutcome {
    pub report: Report,
    pub random_hits: OpCount,
    pub sequential_hits: OpCount,
    /// Store count after the sequential removal (stage 11)
    pub count_after_seq_removal: usize,
    /// Store count after the sequential re-insert (stage 12)
    pub count_after_seq_insertion: usize,
    /// Store count after the keep-size removal (stage 15)
    pub final_count: usize,
    pub final_snapshot: String,
    pub corruption: Option<CorruptionOutcome>,
}

fn insert_all<S: OrderedKeyStore>(store: &mut S, keys: impl IntoIterator<Item = Key>) {
    for key in keys {
        store.insert(key);
    }
}

fn remove_all<S: OrderedKeyStore>(store: &mut S, keys: impl IntoIterator<Item = Key>) {
    for key in keys {
        store.delete_key(key);
    }
}

fn search_all<S: OrderedKeyStore>(store: &S, keys: impl IntoIterator<Item = Key>) -> OpCount {
    keys.into_iter()
        .filter(|&key| store.search(key).is_some_and(|n| n.key == key))
        .count()
}

/// Print the snapshot of a store that failed verification and build the error
fn verification_failure<S: OrderedKeyStore, W: Write>(
    store: &S,
    config: &RunConfig,
    phase: VerifyPhase,
    out: &mut W,
) -> HarnessError {
    let snapshot = store.render(config.width, config.height, NullPolicy::Hide);
    if let Err(e) = writeln!(out, "{}\n", snapshot) {
        return e.into();
    }
    error!("Store is broken after {}. Implementation FAIL.", phase);
    HarnessError::Verification { phase, snapshot }
}

/// Run every stage against a fresh `S`
///
/// The table and snapshots go to `out`; progress goes to the log. Returns
/// [`HarnessError::Verification`] if either structural checkpoint fails.
pub fn run_regression<S, W>(
    config: &RunConfig,
    workloads: &Workloads,
    rng: &mut RandomSource,
    out: &mut W,
) -> Result<RegressionOutcome, HarnessError>
where
    S: OrderedKeyStore + FaultInjection,
    W: Write,
{
    let n = workloads.len();
    let keep = config.keep_size.min(n);
    let sequential = || (0..=Key::MAX).take(n);
    let verify_mode = VerifyMode::chatty(config.full_verify);
    let mut report = Report::new();
    let mut store = S::default();

    // 1. Random-order insertion
    info!("Inserting {} random keys...", n);
    let ((), ns) =
        DurationTimer::measure(|| insert_all(&mut store, workloads.insertion.iter().copied()));
    report.per_key(format!("Insertion, count {}", n), ns, n);
    report.rate("Insertion, rate", ns, n, Unit::NodesPerSec);

    // 2. Verification
    info!("Verifying store...");
    let (valid, ns) = DurationTimer::measure(|| store.verify(verify_mode));
    if !valid {
        return Err(verification_failure(
            &store,
            config,
            VerifyPhase::AfterInsertion,
            out,
        ));
    }
    report.rate("Verification, rate", ns, n, Unit::NodesPerSec);

    // 3. Random-order search
    info!("Finding all {} keys in random order...", n);
    let (random_hits, ns) =
        DurationTimer::measure(|| search_all(&store, workloads.search.iter().copied()));
    info!("{} found.", random_hits);
    report.per_key(format!("Search, count {}", n), ns, n);
    report.rate("Search, rate", ns, n, Unit::HitsPerSec);

    // 4. Sequential search
    info!("Finding all {} keys in sequential order...", n);
    let (sequential_hits, ns) = DurationTimer::measure(|| search_all(&store, sequential()));
    info!("{} found.", sequential_hits);
    report.per_key(format!("Seq search, count {}", n), ns, n);
    report.rate("Seq search, rate", ns, n, Unit::HitsPerSec);

    // 5-8. Traversals
    let mut visited = 0usize;
    info!("Performing in-order traversal with height and black height tracking...");
    let ((), ns) = DurationTimer::measure(|| {
        store.in_order_tracked(Direction::Ascending, &mut |_| visited += 1)
    });
    report.rate("In-order, with tracking, rate", ns, n, Unit::NodesPerSec);

    info!("Performing in-order traversal without height and black height tracking...");
    let ((), ns) =
        DurationTimer::measure(|| store.in_order(Direction::Ascending, &mut |_| visited += 1));
    report.rate("In-order, fast, rate", ns, n, Unit::NodesPerSec);

    info!("Performing breadth-first traversal with height and black height tracking...");
    let ((), ns) = DurationTimer::measure(|| {
        store.breadth_first_tracked(Direction::Ascending, &mut |_| visited += 1)
    });
    report.rate("Breadth first, tracking, rate", ns, n, Unit::NodesPerSec);

    info!("Performing breadth-first traversal without height and black height tracking...");
    let ((), ns) = DurationTimer::measure(|| {
        store.breadth_first(Direction::Ascending, &mut |_| visited += 1)
    });
    report.rate("Breadth first, fast, rate", ns, n, Unit::NodesPerSec);
    debug!(visited, "traversals complete");

    // 9. Destruction
    info!("Destroying store...");
    let ((), ns) = DurationTimer::measure(|| store.destroy());
    report.rate("Destruction, rate", ns, n, Unit::NodesPerSec);

    // 10. Fresh store, random-order fill
    store = S::default();
    info!("Re-adding {} keys in random order...", n);
    insert_all(&mut store, workloads.insertion.iter().copied());

    // 11. Sequential removal
    info!("Removing all {} keys in sequential order...", n);
    let ((), ns) = DurationTimer::measure(|| remove_all(&mut store, sequential()));
    let count_after_seq_removal = store.count();
    report.per_key(format!("Seq removal, count {}", n), ns, n);
    report.rate("Seq removal, rate", ns, n, Unit::NodesPerSec);

    // 12. Sequential insertion
    info!("Re-adding {} keys in sequential order...", n);
    let ((), ns) = DurationTimer::measure(|| insert_all(&mut store, sequential()));
    let count_after_seq_insertion = store.count();
    report.per_key(format!("Seq insertion, count {}", n), ns, n);
    report.rate("Seq insertion, rate", ns, n, Unit::NodesPerSec);

    // 13-14. Empty again, then random-order fill
    info!("Removing all {} keys in sequential order again...", n);
    remove_all(&mut store, sequential());
    info!("Re-adding {} keys in random order...", n);
    insert_all(&mut store, workloads.insertion.iter().copied());

    // 15. Keep-size removal: a value filter over the removal order, so
    // exactly n - keep keys qualify
    if keep < n {
        let removed = n - keep;
        info!("Removing {} keys in random order to leave {} keys...", removed, keep);
        let ((), ns) = DurationTimer::measure(|| {
            remove_all(
                &mut store,
                workloads
                    .removal
                    .iter()
                    .copied()
                    .filter(|&k| k as usize >= keep),
            )
        });
        report.per_key(format!("Removal, count {}", removed), ns, removed);
        report.rate("Removal, rate", ns, n, Unit::NodesPerSec);
    }
    let final_count = store.count();

    // 16. Results, snapshot, verification
    write!(out, "\nTest results:\n\n{}\n", report)?;
    info!("Final store with {} nodes:", final_count);
    let final_snapshot = store.render(config.width, config.height, NullPolicy::Hide);
    writeln!(out, "{}\n", final_snapshot)?;

    info!("Verifying store...");
    if !store.verify(verify_mode) {
        return Err(verification_failure(
            &store,
            config,
            VerifyPhase::AfterRemoval,
            out,
        ));
    }

    // 17. Fault injection
    let corruption = if config.break_size > 0 && keep > 0 {
        Some(corrupt(&mut store, config, keep, verify_mode, rng, out)?)
    } else {
        None
    };

    // 18. Release
    info!("Cleaning up...");
    store.destroy();
    out.flush()?;

    Ok(RegressionOutcome {
        report,
        random_hits,
        sequential_hits,
        count_after_seq_removal,
        count_after_seq_insertion,
        final_count,
        final_snapshot,
        corruption,
    })
}

/// Force random nodes red and report whether verification notices
///
/// Survival is a legitimate outcome: recolouring a node that is already
/// red, or one whose change only the full check would see, leaves the
/// store valid as far as the verifier can tell.
fn corrupt<S, W>(
    store: &mut S,
    config: &RunConfig,
    keep: usize,
    verify_mode: VerifyMode,
    rng: &mut RandomSource,
    out: &mut W,
) -> Result<CorruptionOutcome, HarnessError>
where
    S: OrderedKeyStore + FaultInjection,
    W: Write,
{
    let attempts = config.break_size;
    info!(
        "Painting {} random nodes red in an attempt to invalidate the store...",
        attempts
    );
    let mut recoloured = 0;
    for _ in 0..attempts {
        let key = rng.below(keep) as Key;
        if store.search(key).is_some() && store.force_red(key) {
            recoloured += 1;
        }
    }
    info!(recoloured, "Most likely broken store with {} nodes:", store.count());
    writeln!(
        out,
        "{}\n",
        store.render(config.width, config.height, NullPolicy::Hide)
    )?;

    let detected = !store.verify(verify_mode);
    if detected {
        info!("Corruption detected by verification.");
    } else {
        warn!("Store still valid after corruption... lucky draw.");
    }
    Ok(CorruptionOutcome {
        attempts,
        recoloured,
        detected,
    })
}
