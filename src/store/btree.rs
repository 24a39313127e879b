//! BTreeStore - BTreeMap-backed ordered key store
//!
//! Keys live in a `std::collections::BTreeMap`, so the balancing itself is
//! the standard library's. On top of that the adapter exposes a red-black
//! *view*: the perfectly balanced binary tree over the current key order.
//!
//! # Shape
//!
//! For the keys in ascending order, the root of any index range `[lo, hi)`
//! is the element at `lo + (hi - lo) / 2`. Subtree sizes never differ by
//! more than one, so every empty child slot sits on one of at most two
//! adjacent levels.
//!
//! # Colours
//!
//! | Node | Colour |
//! |------|--------|
//! | on the last level of an incomplete shape | red |
//! | any other | black |
//! | stored flag forced by [`FaultInjection`] | red |
//!
//! With untouched flags this colouring satisfies every red-black rule.
//! [`NodeView::red`] reports the stored flag only.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;

use tracing::warn;

use super::{
    Direction, FaultInjection, Limit, NodeView, NullPolicy, OrderedKeyStore, TrackedNode,
    VerifyMode,
};
use crate::core_types::Key;

#[derive(Debug, Default, Clone, Copy)]
struct NodeFlags {
    red: bool,
}

/// Ordered key store over `BTreeMap`
///
/// # Complexity:
/// | Operation | Time |
/// |-----------|------|
/// | insert / delete_key / search | O(log n) |
/// | in_order / in_order_range | O(n) / O(log n + k) |
/// | root / verify / breadth_first / tracked walks / render | O(n) |
#[derive(Debug, Default)]
pub struct BTreeStore {
    nodes: BTreeMap<Key, NodeFlags>,
}

impl BTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shape(&self) -> Shape {
        Shape::capture(&self.nodes)
    }
}

/// Snapshot of the balanced view, keys in ascending order
struct Shape {
    slots: Vec<NodeView>,
    /// Depth whose nodes are implicitly red, if the last level is incomplete
    fringe_depth: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Metrics {
    height: u32,
    black_height: u32,
}

impl Shape {
    fn capture(nodes: &BTreeMap<Key, NodeFlags>) -> Self {
        let slots: Vec<NodeView> = nodes
            .iter()
            .map(|(&key, flags)| NodeView {
                key,
                red: flags.red,
            })
            .collect();
        let n = slots.len();
        let fringe_depth = if n == 0 || (n + 1).is_power_of_two() {
            None
        } else {
            Some(n.ilog2())
        };
        Self {
            slots,
            fringe_depth,
        }
    }

    #[inline]
    fn mid(lo: usize, hi: usize) -> usize {
        lo + (hi - lo) / 2
    }

    #[inline]
    fn is_red(&self, idx: usize, depth: u32) -> bool {
        self.slots[idx].red || self.fringe_depth == Some(depth)
    }

    /// Child ranges of `[lo, hi)` in visit order
    fn children(lo: usize, hi: usize, direction: Direction) -> [(usize, usize); 2] {
        let m = Self::mid(lo, hi);
        match direction {
            Direction::Ascending => [(lo, m), (m + 1, hi)],
            Direction::Descending => [(m + 1, hi), (lo, m)],
        }
    }

    /// Height and black height of every node, indexed like `slots`
    fn metrics(&self) -> Vec<Metrics> {
        let mut out = vec![Metrics::default(); self.slots.len()];
        self.measure(0, self.slots.len(), 0, &mut out);
        out
    }

    fn measure(&self, lo: usize, hi: usize, depth: u32, out: &mut [Metrics]) -> Metrics {
        if lo >= hi {
            return Metrics::default();
        }
        let m = Self::mid(lo, hi);
        let left = self.measure(lo, m, depth + 1, out);
        let right = self.measure(m + 1, hi, depth + 1, out);
        let own = Metrics {
            height: left.height.max(right.height) + 1,
            black_height: left.black_height.max(right.black_height)
                + u32::from(!self.is_red(m, depth)),
        };
        out[m] = own;
        own
    }

    /// Returns the black height of `[lo, hi)`, empty slots counting as one
    fn check(
        &self,
        lo: usize,
        hi: usize,
        depth: u32,
        parent_red: bool,
        full: bool,
        faults: &mut Vec<String>,
    ) -> u32 {
        if lo >= hi {
            return 1;
        }
        let m = Self::mid(lo, hi);
        let key = self.slots[m].key;
        let red = self.is_red(m, depth);
        if red && parent_red {
            faults.push(format!("red node {} has a red parent", key));
        }
        let left = self.check(lo, m, depth + 1, red, full, faults);
        let right = self.check(m + 1, hi, depth + 1, red, full, faults);
        if full && left != right {
            faults.push(format!(
                "black height mismatch under {}: left {}, right {}",
                key, left, right
            ));
        }
        left.max(right) + u32::from(!red)
    }

    fn walk_breadth_first(&self, direction: Direction, mut visit: impl FnMut(usize)) {
        let mut queue = VecDeque::new();
        queue.push_back((0, self.slots.len()));
        while let Some((lo, hi)) = queue.pop_front() {
            if lo >= hi {
                continue;
            }
            visit(Self::mid(lo, hi));
            for child in Self::children(lo, hi, direction) {
                queue.push_back(child);
            }
        }
    }

    fn label(&self, idx: usize, depth: u32) -> String {
        let key = self.slots[idx].key;
        if self.is_red(idx, depth) {
            format!("<{}>", key)
        } else {
            key.to_string()
        }
    }
}

/// Centre `text` in a cell of `width` columns, cutting it if it does not fit
fn centred(text: &str, width: usize) -> String {
    let text: String = text.chars().take(width).collect();
    let pad = width - text.chars().count();
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

impl OrderedKeyStore for BTreeStore {
    fn count(&self) -> usize {
        self.nodes.len()
    }

    fn root(&self) -> Option<NodeView> {
        let n = self.nodes.len();
        self.nodes
            .iter()
            .nth(n / 2)
            .map(|(&key, flags)| NodeView {
                key,
                red: flags.red,
            })
    }

    #[inline]
    fn insert(&mut self, key: Key) {
        self.nodes.entry(key).or_default();
    }

    #[inline]
    fn delete_key(&mut self, key: Key) {
        self.nodes.remove(&key);
    }

    #[inline]
    fn search(&self, key: Key) -> Option<NodeView> {
        self.nodes.get_key_value(&key).map(|(&key, flags)| NodeView {
            key,
            red: flags.red,
        })
    }

    fn verify(&self, mode: VerifyMode) -> bool {
        let shape = self.shape();
        let mut faults = Vec::new();

        for pair in shape.slots.windows(2) {
            if pair[0].key >= pair[1].key {
                faults.push(format!(
                    "keys out of order: {} before {}",
                    pair[0].key, pair[1].key
                ));
            }
        }

        let n = shape.slots.len();
        if n > 0 && shape.is_red(Shape::mid(0, n), 0) {
            faults.push(format!("root {} is red", shape.slots[Shape::mid(0, n)].key));
        }
        shape.check(0, n, 0, false, mode.full, &mut faults);

        if mode.chatty {
            for fault in &faults {
                warn!(fault = %fault, "store verification");
            }
        }
        faults.is_empty()
    }

    fn in_order(&self, direction: Direction, visit: &mut dyn FnMut(NodeView)) {
        let view = |(&key, flags): (&Key, &NodeFlags)| NodeView {
            key,
            red: flags.red,
        };
        match direction {
            Direction::Ascending => self.nodes.iter().map(view).for_each(visit),
            Direction::Descending => self.nodes.iter().rev().map(view).for_each(visit),
        }
    }

    fn breadth_first(&self, direction: Direction, visit: &mut dyn FnMut(NodeView)) {
        let shape = self.shape();
        shape.walk_breadth_first(direction, |idx| visit(shape.slots[idx]));
    }

    fn in_order_range(
        &self,
        direction: Direction,
        lower: Limit,
        upper: Limit,
        visit: &mut dyn FnMut(NodeView),
    ) -> usize {
        // BTreeMap::range panics on inverted or empty-exclusive bounds
        if lower.key > upper.key
            || (lower.key == upper.key && !(lower.inclusive && upper.inclusive))
        {
            return 0;
        }
        let bound = |limit: Limit| {
            if limit.inclusive {
                Bound::Included(limit.key)
            } else {
                Bound::Excluded(limit.key)
            }
        };
        let range = self.nodes.range((bound(lower), bound(upper)));
        let mut visited = 0;
        let mut each = |(&key, flags): (&Key, &NodeFlags)| {
            visited += 1;
            visit(NodeView {
                key,
                red: flags.red,
            });
        };
        match direction {
            Direction::Ascending => range.for_each(&mut each),
            Direction::Descending => range.rev().for_each(&mut each),
        }
        visited
    }

    fn in_order_tracked(&self, direction: Direction, visit: &mut dyn FnMut(TrackedNode)) {
        let shape = self.shape();
        let metrics = shape.metrics();
        let tracked = |idx: usize| TrackedNode {
            node: shape.slots[idx],
            height: metrics[idx].height,
            black_height: metrics[idx].black_height,
        };
        match direction {
            Direction::Ascending => (0..shape.slots.len()).map(tracked).for_each(visit),
            Direction::Descending => (0..shape.slots.len()).rev().map(tracked).for_each(visit),
        }
    }

    fn breadth_first_tracked(&self, direction: Direction, visit: &mut dyn FnMut(TrackedNode)) {
        let shape = self.shape();
        let metrics = shape.metrics();
        shape.walk_breadth_first(direction, |idx| {
            visit(TrackedNode {
                node: shape.slots[idx],
                height: metrics[idx].height,
                black_height: metrics[idx].black_height,
            })
        });
    }

    fn render(&self, width: usize, height: usize, nulls: NullPolicy) -> String {
        let shape = self.shape();
        if shape.slots.is_empty() {
            return "(empty)".to_string();
        }

        let mut lines = Vec::new();
        // Each entry is an index range; empty ranges keep later levels aligned
        let mut level = vec![(0usize, shape.slots.len())];
        let mut depth = 0u32;
        while lines.len() < height && level.iter().any(|&(lo, hi)| lo < hi) {
            let cell = width / level.len();
            if cell == 0 {
                break;
            }
            let mut line = String::with_capacity(width);
            let mut next = Vec::with_capacity(level.len() * 2);
            for &(lo, hi) in &level {
                if lo < hi {
                    line.push_str(&centred(&shape.label(Shape::mid(lo, hi), depth), cell));
                    next.extend(Shape::children(lo, hi, Direction::Ascending));
                } else {
                    let text = if nulls == NullPolicy::Show { "." } else { "" };
                    line.push_str(&centred(text, cell));
                    next.extend([(lo, lo), (lo, lo)]);
                }
            }
            lines.push(line.trim_end().to_string());
            level = next;
            depth += 1;
        }
        lines.join("\n")
    }

    fn destroy(self) {
        drop(self.nodes);
    }
}

impl FaultInjection for BTreeStore {
    fn force_red(&mut self, key: Key) -> bool {
        match self.nodes.get_mut(&key) {
            Some(flags) => {
                flags.red = true;
                true
            }
            None => false,
        }
    }
}
