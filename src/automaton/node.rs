//! Automaton states stored in the node arena.

use super::transitions::TransitionTable;

/// Index of a node in the automaton's arena.
///
/// Ids are stable for the lifetime of the arena: nodes are never relocated,
/// so fail links and transition entries can refer to each other freely,
/// including the root's fail link back to itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The root node, always at index 0.
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        NodeId(index as u32)
    }

    /// Position of the node in the arena.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this id refers to the root.
    #[inline]
    pub(crate) fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A state in the automaton.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// Goto transitions to child nodes.
    pub(crate) transitions: TransitionTable,
    /// Longest proper suffix of this node's path that is also a trie prefix.
    pub(crate) fail: NodeId,
    /// Sum of multiplicities of patterns ending exactly here.
    pub(crate) own_weight: i64,
    /// `own_weight` summed along the fail chain down to root.
    ///
    /// Only meaningful while the automaton is not stale.
    pub(crate) agg_weight: i64,
}

impl Node {
    pub(crate) fn new() -> Self {
        Node {
            transitions: TransitionTable::new(),
            fail: NodeId::ROOT,
            own_weight: 0,
            agg_weight: 0,
        }
    }
}
