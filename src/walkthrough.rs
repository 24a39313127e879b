//! Walkthrough - the store API on a small fixed data set
//!
//! Inserts `0..13`, checks the store, prints a snapshot, both full walks and
//! two bounded walks. Handy for eyeballing a store implementation before
//! pointing the benchmarks at it.

use std::io::Write;

use tracing::info;

use crate::core_types::Key;
use crate::error::HarnessError;
use crate::store::{Direction, Limit, NodeView, NullPolicy, OrderedKeyStore, VerifyMode};

const KEYS: Key = 13;
const WIDTH: usize = 80;
const HEIGHT: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkthroughSummary {
    pub valid: bool,
    pub in_order: Vec<Key>,
    pub breadth_first: Vec<Key>,
    /// Keys in `[4, 9)`, ascending
    pub lower_inclusive: Vec<Key>,
    /// Keys in `(4, 9]`, descending
    pub upper_inclusive: Vec<Key>,
}

fn line<W: Write>(out: &mut W, title: &str, keys: &[Key]) -> std::io::Result<()> {
    write!(out, "{}:", title)?;
    for key in keys {
        write!(out, " {}", key)?;
    }
    Ok(())
}

pub fn run_walkthrough<S: OrderedKeyStore, W: Write>(
    out: &mut W,
) -> Result<WalkthroughSummary, HarnessError> {
    let mut store = S::default();
    for key in 0..KEYS {
        store.insert(key);
    }

    let valid = store.verify(VerifyMode::chatty(true));
    info!(valid, "Store with {} keys verified", store.count());
    writeln!(out, "{}\n", store.render(WIDTH, HEIGHT, NullPolicy::Hide))?;

    let mut in_order = Vec::new();
    store.in_order(Direction::Ascending, &mut |n: NodeView| in_order.push(n.key));
    line(out, "In order", &in_order)?;
    writeln!(out)?;

    let mut breadth_first = Vec::new();
    store.breadth_first(Direction::Ascending, &mut |n: NodeView| {
        breadth_first.push(n.key)
    });
    line(out, "Breadth first", &breadth_first)?;
    writeln!(out)?;

    let mut lower_inclusive = Vec::new();
    let count = store.in_order_range(
        Direction::Ascending,
        Limit::incl(4),
        Limit::excl(9),
        &mut |n| lower_inclusive.push(n.key),
    );
    line(out, "Between 4 (inclusive) and 9 (exclusive)", &lower_inclusive)?;
    writeln!(out, ", in range: {} nodes", count)?;

    let mut upper_inclusive = Vec::new();
    let count = store.in_order_range(
        Direction::Descending,
        Limit::excl(4),
        Limit::incl(9),
        &mut |n| upper_inclusive.push(n.key),
    );
    line(out, "Between 4 (exclusive) and 9 (inclusive)", &upper_inclusive)?;
    writeln!(out, ", in range: {} nodes", count)?;

    store.destroy();
    out.flush()?;

    Ok(WalkthroughSummary {
        valid,
        in_order,
        breadth_first,
        lower_inclusive,
        upper_inclusive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BTreeStore;

    #[test]
    fn test_walkthrough_output() {
        let mut out = Vec::new();
        let summary = run_walkthrough::<BTreeStore, _>(&mut out).unwrap();

        assert!(summary.valid);
        assert_eq!(summary.in_order, (0..13).collect::<Vec<_>>());
        assert_eq!(summary.breadth_first.len(), 13);
        assert_eq!(summary.breadth_first[0], 6);
        assert_eq!(summary.lower_inclusive, vec![4, 5, 6, 7, 8]);
        assert_eq!(summary.upper_inclusive, vec![9, 8, 7, 6, 5]);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("In order: 0 1 2 3 4 5 6 7 8 9 10 11 12\n"));
        assert!(text.contains("Between 4 (inclusive) and 9 (exclusive): 4 5 6 7 8, in range: 5 nodes"));
        assert!(text.contains("Between 4 (exclusive) and 9 (inclusive): 9 8 7 6 5, in range: 5 nodes"));
    }
}
