//! OrderedKeyStore - the contract the harness drives
//!
//! The harness never looks inside a store. Everything it needs is listed
//! here: mutation, lookup, self-check, traversal, rendering and teardown.
//! Corrupting a store on purpose is a separate capability
//! ([`FaultInjection`]) so that the one place which depends on it is
//! visible in its trait bounds.
//!
//! [`BTreeStore`] is the adapter shipped with the crate.

pub mod btree;

pub use btree::BTreeStore;

use crate::core_types::Key;

/// Read-only view of one store node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub key: Key,
    /// Stored colour flag
    pub red: bool,
}

/// Node visited by a tracked traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedNode {
    pub node: NodeView,
    /// Nodes on the longest downward path, this node included
    pub height: u32,
    /// Black nodes on a downward path to a leaf, this node included
    pub black_height: u32,
}

/// Visit order for traversals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One end of a bounded traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub key: Key,
    pub inclusive: bool,
}

impl Limit {
    pub fn incl(key: Key) -> Self {
        Self {
            key,
            inclusive: true,
        }
    }

    pub fn excl(key: Key) -> Self {
        Self {
            key,
            inclusive: false,
        }
    }
}

/// Self-check options
///
/// `chatty` prints every violation on the diagnostic stream; `full` adds the
/// more expensive checks (black-height balance) to the quick ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifyMode {
    pub chatty: bool,
    pub full: bool,
}

impl VerifyMode {
    pub fn chatty(full: bool) -> Self {
        Self { chatty: true, full }
    }

    pub fn quiet(full: bool) -> Self {
        Self {
            chatty: false,
            full,
        }
    }
}

/// Whether rendering draws empty child slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    #[default]
    Hide,
    Show,
}

/// Ordered set of [`Key`]s with structural self-check
///
/// `Default::default()` creates an empty store. Every method is infallible:
/// absent keys are reported as `None` or ignored, never as errors.
pub trait OrderedKeyStore: Default {
    /// Current node count
    fn count(&self) -> usize;

    /// Entry node, `None` when empty
    fn root(&self) -> Option<NodeView>;

    /// Insert a key (duplicates are the store's own concern)
    fn insert(&mut self, key: Key);

    /// Remove a key if present
    fn delete_key(&mut self, key: Key);

    fn search(&self, key: Key) -> Option<NodeView>;

    /// Returns true iff all structural invariants hold
    fn verify(&self, mode: VerifyMode) -> bool;

    fn in_order(&self, direction: Direction, visit: &mut dyn FnMut(NodeView));

    fn breadth_first(&self, direction: Direction, visit: &mut dyn FnMut(NodeView));

    /// In-order walk restricted to `[lower, upper]` (per-end inclusivity);
    /// returns the number of nodes visited
    fn in_order_range(
        &self,
        direction: Direction,
        lower: Limit,
        upper: Limit,
        visit: &mut dyn FnMut(NodeView),
    ) -> usize;

    /// Like [`in_order`](Self::in_order), computing height metrics on the way
    fn in_order_tracked(&self, direction: Direction, visit: &mut dyn FnMut(TrackedNode));

    fn breadth_first_tracked(&self, direction: Direction, visit: &mut dyn FnMut(TrackedNode));

    /// ASCII snapshot bounded by `width` columns and `height` lines
    fn render(&self, width: usize, height: usize, nulls: NullPolicy) -> String;

    /// Release every node
    fn destroy(self) {
        drop(self);
    }
}

/// Privileged, test-only mutation
///
/// Bypasses the store's own mutation API to break its invariants on
/// purpose. Only the corruption stage of the regression suite uses it.
pub trait FaultInjection {
    /// Force the node holding `key` red. Returns false if the key is absent.
    fn force_red(&mut self, key: Key) -> bool;
}
